//! Loosely-typed caller input.

use alloy::primitives::{Address, I256, U256};
use serde_json::Value;

/// A dynamic value supplied by the caller. The engine only reads it.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    /// A value with named fields, looked up by camel-case name.
    Record(Record),
    /// String-keyed entries, looked up by exact key. Order is preserved and the
    /// first matching key wins.
    Map(Vec<(String, InputValue)>),
    List(Vec<InputValue>),
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    BigInt(I256),
    BigUint(U256),
    Bool(bool),
    /// A byte sequence of any length.
    Bytes(Vec<u8>),
    /// A fixed-size byte array (`bytesN` / `function` shaped input).
    ByteArray(Vec<u8>),
    Address(Address),
    /// A nullable reference. `None` marks the value as not applicable.
    Optional(Option<Box<InputValue>>),
    /// A value with no representable shape (callbacks, streams). Fields looked
    /// up on it are treated as not applicable.
    Opaque,
}

/// Named fields of a record-shaped input, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, InputValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn fields(&self) -> &[(String, InputValue)] {
        &self.fields
    }
}

impl InputValue {
    pub fn null() -> Self {
        InputValue::Optional(None)
    }

    /// Build a map from `(key, value)` pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<InputValue>,
    {
        InputValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn list<V: Into<InputValue>>(items: impl IntoIterator<Item = V>) -> Self {
        InputValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Short description of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            InputValue::Record(_) => "record",
            InputValue::Map(_) => "map",
            InputValue::List(_) => "list",
            InputValue::Str(_) => "string",
            InputValue::Int(_) => "signed integer",
            InputValue::Uint(_) => "unsigned integer",
            InputValue::Float(_) => "float",
            InputValue::BigInt(_) => "int256",
            InputValue::BigUint(_) => "uint256",
            InputValue::Bool(_) => "bool",
            InputValue::Bytes(_) => "byte sequence",
            InputValue::ByteArray(_) => "byte array",
            InputValue::Address(_) => "address",
            InputValue::Optional(None) => "null",
            InputValue::Optional(Some(_)) => "optional",
            InputValue::Opaque => "opaque value",
        }
    }

    /// Follow non-null optionals down to the value they hold.
    pub fn deref_optional(&self) -> &InputValue {
        match self {
            InputValue::Optional(Some(inner)) => inner.deref_optional(),
            other => other,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            InputValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Record> for InputValue {
    fn from(record: Record) -> Self {
        InputValue::Record(record)
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::Str(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        InputValue::Str(s)
    }
}

impl From<bool> for InputValue {
    fn from(b: bool) -> Self {
        InputValue::Bool(b)
    }
}

impl From<f32> for InputValue {
    fn from(f: f32) -> Self {
        InputValue::Float(f64::from(f))
    }
}

impl From<f64> for InputValue {
    fn from(f: f64) -> Self {
        InputValue::Float(f)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for InputValue {
            fn from(v: $t) -> Self {
                InputValue::Int(i64::from(v))
            }
        }
    )*};
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for InputValue {
            fn from(v: $t) -> Self {
                InputValue::Uint(u64::from(v))
            }
        }
    )*};
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<I256> for InputValue {
    fn from(v: I256) -> Self {
        InputValue::BigInt(v)
    }
}

impl From<U256> for InputValue {
    fn from(v: U256) -> Self {
        InputValue::BigUint(v)
    }
}

impl From<Address> for InputValue {
    fn from(addr: Address) -> Self {
        InputValue::Address(addr)
    }
}

impl From<Vec<u8>> for InputValue {
    fn from(bytes: Vec<u8>) -> Self {
        InputValue::Bytes(bytes)
    }
}

impl<const N: usize> From<[u8; N]> for InputValue {
    fn from(bytes: [u8; N]) -> Self {
        InputValue::ByteArray(bytes.to_vec())
    }
}

impl<T: Into<InputValue>> From<Option<T>> for InputValue {
    fn from(value: Option<T>) -> Self {
        InputValue::Optional(value.map(|v| Box::new(v.into())))
    }
}

/// JSON objects become maps (keys matched exactly), arrays become lists and
/// `null` becomes a null optional. Numbers keep their JSON representation:
/// non-negative integers as `Uint`, negative integers as `Int`, everything
/// else as `Float`.
impl From<Value> for InputValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => InputValue::Optional(None),
            Value::Bool(b) => InputValue::Bool(b),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    InputValue::Uint(u)
                } else if let Some(i) = n.as_i64() {
                    InputValue::Int(i)
                } else {
                    InputValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => InputValue::Str(s),
            Value::Array(items) => InputValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                InputValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&Value> for InputValue {
    fn from(value: &Value) -> Self {
        value.clone().into()
    }
}
