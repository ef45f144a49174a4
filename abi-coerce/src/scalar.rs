//! Mapping of resolved values onto non-composite ABI kinds.

use alloy::primitives::{Address, Function};

use crate::error::{CoerceError, Result};
use crate::input::InputValue;
use crate::numeric::{Base, coerce_int, coerce_uint};
use crate::types::AbiType;
use crate::util::{decode_prefixed_hex, has_hex_prefix, is_hex_address, strip_hex_prefix};
use crate::value::TypedValue;
use crate::{ADDRESS_LENGTH, FUNCTION_LENGTH, MAX_FIXED_BYTES, MAX_STRING_BYTES};

/// Map a resolved value onto a scalar ABI type.
///
/// Composite types are rejected here; they go through
/// [`crate::composite::map_value`].
pub fn map_scalar(ty: &AbiType, value: &InputValue) -> Result<TypedValue> {
    let value = value.deref_optional();
    let mismatch = || CoerceError::mismatch(ty, value.kind());

    match ty {
        AbiType::Int(bits) => coerce_int(value, Base::for_input(value), *bits).map(TypedValue::Int),
        AbiType::Uint(bits) => {
            coerce_uint(value, Base::for_input(value), *bits).map(TypedValue::Uint)
        }
        AbiType::Bool => map_bool(value).ok_or_else(mismatch),
        AbiType::String => match value {
            InputValue::Str(s) if s.len() <= MAX_STRING_BYTES => Ok(TypedValue::String(s.clone())),
            InputValue::Str(s) => Err(CoerceError::out_of_range(
                format!("string of {} bytes", s.len()),
                ty,
            )),
            _ => Err(mismatch()),
        },
        AbiType::Address => map_address(value).ok_or_else(mismatch),
        AbiType::Bytes => match value {
            InputValue::Str(s) if has_hex_prefix(s) => decode_prefixed_hex(s)
                .map(TypedValue::Bytes)
                .ok_or_else(mismatch),
            InputValue::Bytes(bytes) => Ok(TypedValue::Bytes(bytes.clone())),
            _ => Err(mismatch()),
        },
        AbiType::FixedBytes(len) => {
            if !(1..=MAX_FIXED_BYTES).contains(len) {
                return Err(CoerceError::UnsupportedKind(ty.to_string()));
            }
            let bytes = match value {
                InputValue::ByteArray(bytes) | InputValue::Bytes(bytes) => bytes.clone(),
                InputValue::Str(s) if has_hex_prefix(s) => {
                    decode_prefixed_hex(s).ok_or_else(mismatch)?
                }
                _ => return Err(mismatch()),
            };
            if bytes.len() != *len {
                return Err(mismatch());
            }
            Ok(TypedValue::FixedBytes(bytes))
        }
        AbiType::Function => match value {
            InputValue::ByteArray(bytes) if bytes.len() == FUNCTION_LENGTH => {
                Ok(TypedValue::Function(Function::from_slice(bytes)))
            }
            _ => Err(mismatch()),
        },
        AbiType::FixedPoint { .. } | AbiType::Hash => {
            Err(CoerceError::UnsupportedKind(ty.to_string()))
        }
        AbiType::Tuple(_) | AbiType::Array(..) | AbiType::Slice(_) => Err(mismatch()),
    }
}

/// `"0x1"`/`"0x0"`, `"true"`/`"false"` or a native bool. Prefixed text other
/// than the two exact hex spellings is rejected, including `"0X1"`.
fn map_bool(value: &InputValue) -> Option<TypedValue> {
    let b = match value {
        InputValue::Str(s) if has_hex_prefix(s) => match s.as_str() {
            "0x1" => true,
            "0x0" => false,
            _ => return None,
        },
        InputValue::Str(s) => match s.as_str() {
            "true" => true,
            "false" => false,
            _ => return None,
        },
        InputValue::Bool(b) => *b,
        _ => return None,
    };
    Some(TypedValue::Bool(b))
}

fn map_address(value: &InputValue) -> Option<TypedValue> {
    let address = match value {
        InputValue::Address(addr) => *addr,
        InputValue::Str(s) if is_hex_address(s) => {
            let digits = strip_hex_prefix(s).unwrap_or(s);
            Address::from_slice(&hex::decode(digits).ok()?)
        }
        InputValue::Bytes(bytes) if bytes.len() == ADDRESS_LENGTH => Address::from_slice(bytes),
        _ => return None,
    };
    Some(TypedValue::Address(address))
}
