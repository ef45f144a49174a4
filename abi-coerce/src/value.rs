//! Coerced values and their hand-off to alloy's ABI encoder.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256, Function, I256, U256};

use crate::numeric::{IntValue, UintValue, WideInt, WideUint};
use crate::types::AbiType;
use crate::MAX_FIXED_BYTES;

/// A value whose shape matches its [`AbiType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Int(IntValue),
    Uint(UintValue),
    Bool(bool),
    String(String),
    Address(Address),
    Bytes(Vec<u8>),
    /// Exactly N bytes for `bytesN`.
    FixedBytes(Vec<u8>),
    Function(Function),
    /// Tuple fields, named and in declaration order.
    Tuple(Vec<(String, TypedValue)>),
    /// Elements of a fixed-length `T[N]`.
    FixedArray(Vec<TypedValue>),
    /// Elements of a dynamic `T[]`.
    Array(Vec<TypedValue>),
    /// A not-applicable value: the input marked it as absent.
    Skip,
}

impl TypedValue {
    pub fn is_skip(&self) -> bool {
        matches!(self, TypedValue::Skip)
    }

    /// True if this value or anything nested in it is [`TypedValue::Skip`].
    pub fn contains_skip(&self) -> bool {
        match self {
            TypedValue::Skip => true,
            TypedValue::Tuple(fields) => fields.iter().any(|(_, v)| v.contains_skip()),
            TypedValue::FixedArray(items) | TypedValue::Array(items) => {
                items.iter().any(TypedValue::contains_skip)
            }
            _ => false,
        }
    }

    /// True if every fixed-length array in this value holds exactly the number
    /// of elements `ty` declares for it, and tuples have their declared arity.
    pub fn matches_fixed_lengths(&self, ty: &AbiType) -> bool {
        match (self, ty) {
            (TypedValue::Tuple(fields), AbiType::Tuple(decls)) => {
                fields.len() == decls.len()
                    && fields
                        .iter()
                        .zip(decls)
                        .all(|((_, v), decl)| v.matches_fixed_lengths(&decl.ty))
            }
            (TypedValue::FixedArray(items), AbiType::Array(elem, len)) => {
                items.len() == *len && items.iter().all(|v| v.matches_fixed_lengths(elem))
            }
            (TypedValue::Array(items), AbiType::Slice(elem)) => {
                items.iter().all(|v| v.matches_fixed_lengths(elem))
            }
            _ => true,
        }
    }

    /// Convert to alloy's dynamic value. Returns `None` if a skipped value is
    /// still present anywhere in the tree, or for fixed bytes longer than a word.
    pub fn to_sol_value(&self) -> Option<DynSolValue> {
        Some(match self {
            TypedValue::Int(v) => DynSolValue::Int(v.to_i256(), v.bits()),
            TypedValue::Uint(v) => DynSolValue::Uint(v.to_u256(), v.bits()),
            TypedValue::Bool(b) => DynSolValue::Bool(*b),
            TypedValue::String(s) => DynSolValue::String(s.clone()),
            TypedValue::Address(a) => DynSolValue::Address(*a),
            TypedValue::Bytes(b) => DynSolValue::Bytes(b.clone()),
            TypedValue::FixedBytes(b) => {
                if b.len() > MAX_FIXED_BYTES {
                    return None;
                }
                let mut word = B256::ZERO;
                word[..b.len()].copy_from_slice(b);
                DynSolValue::FixedBytes(word, b.len())
            }
            TypedValue::Function(f) => DynSolValue::Function(*f),
            TypedValue::Tuple(fields) => DynSolValue::Tuple(
                fields
                    .iter()
                    .map(|(_, v)| v.to_sol_value())
                    .collect::<Option<_>>()?,
            ),
            TypedValue::FixedArray(items) => DynSolValue::FixedArray(
                items
                    .iter()
                    .map(TypedValue::to_sol_value)
                    .collect::<Option<_>>()?,
            ),
            TypedValue::Array(items) => DynSolValue::Array(
                items
                    .iter()
                    .map(TypedValue::to_sol_value)
                    .collect::<Option<_>>()?,
            ),
            TypedValue::Skip => return None,
        })
    }

    /// The zero value of `ty`: `0`, `false`, empty string/bytes, the zero
    /// address, all-zero fixed bytes, zeroed tuples, `N` zeroed elements for
    /// `T[N]` and an empty `T[]`.
    ///
    /// Reserved kinds and `bytesN` outside 1..=32 have no zero value.
    pub fn zero(ty: &AbiType) -> Option<TypedValue> {
        Some(match ty {
            AbiType::Int(bits) => TypedValue::Int(match bits {
                8 => IntValue::I8(0),
                16 => IntValue::I16(0),
                32 => IntValue::I32(0),
                64 => IntValue::I64(0),
                _ => IntValue::Wide(WideInt::new(I256::ZERO, *bits)?),
            }),
            AbiType::Uint(bits) => TypedValue::Uint(match bits {
                8 => UintValue::U8(0),
                16 => UintValue::U16(0),
                32 => UintValue::U32(0),
                64 => UintValue::U64(0),
                _ => UintValue::Wide(WideUint::new(U256::ZERO, *bits)?),
            }),
            AbiType::Bool => TypedValue::Bool(false),
            AbiType::String => TypedValue::String(String::new()),
            AbiType::Address => TypedValue::Address(Address::ZERO),
            AbiType::Bytes => TypedValue::Bytes(Vec::new()),
            AbiType::FixedBytes(len) if (1..=MAX_FIXED_BYTES).contains(len) => {
                TypedValue::FixedBytes(vec![0; *len])
            }
            AbiType::FixedBytes(_) => return None,
            AbiType::Function => TypedValue::Function(Function::ZERO),
            AbiType::Tuple(fields) => TypedValue::Tuple(
                fields
                    .iter()
                    .map(|f| Some((f.name.clone(), TypedValue::zero(&f.ty)?)))
                    .collect::<Option<_>>()?,
            ),
            AbiType::Array(elem, len) => {
                let zero = TypedValue::zero(elem)?;
                TypedValue::FixedArray(vec![zero; *len])
            }
            AbiType::Slice(_) => TypedValue::Array(Vec::new()),
            AbiType::FixedPoint { .. } | AbiType::Hash => return None,
        })
    }

    /// Replace every nested [`TypedValue::Skip`] with the zero value of the
    /// type declared at that position.
    pub(crate) fn fill_skipped(self, ty: &AbiType) -> Option<TypedValue> {
        match (self, ty) {
            (TypedValue::Skip, ty) => TypedValue::zero(ty),
            (TypedValue::Tuple(fields), AbiType::Tuple(decls)) => Some(TypedValue::Tuple(
                fields
                    .into_iter()
                    .zip(decls)
                    .map(|((name, v), decl)| Some((name, v.fill_skipped(&decl.ty)?)))
                    .collect::<Option<_>>()?,
            )),
            (TypedValue::FixedArray(items), AbiType::Array(elem, _)) => {
                Some(TypedValue::FixedArray(fill_items(items, elem)?))
            }
            (TypedValue::Array(items), AbiType::Slice(elem)) => {
                Some(TypedValue::Array(fill_items(items, elem)?))
            }
            (value, _) => Some(value),
        }
    }
}

fn fill_items(items: Vec<TypedValue>, elem: &AbiType) -> Option<Vec<TypedValue>> {
    items.into_iter().map(|v| v.fill_skipped(elem)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AbiParam;

    #[test]
    fn fixed_bytes_are_left_aligned_in_the_word() {
        let value = TypedValue::FixedBytes(vec![0xaa, 0xbb]).to_sol_value().unwrap();
        let DynSolValue::FixedBytes(word, len) = value else {
            panic!("expected fixed bytes");
        };
        assert_eq!(len, 2);
        assert_eq!(&word[..2], &[0xaa, 0xbb]);
        assert!(word[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn skip_blocks_conversion_at_any_depth() {
        let nested = TypedValue::Tuple(vec![
            ("a".into(), TypedValue::Bool(true)),
            ("b".into(), TypedValue::Array(vec![TypedValue::Skip])),
        ]);
        assert!(nested.contains_skip());
        assert!(nested.to_sol_value().is_none());
    }

    #[test]
    fn zero_values_follow_the_type() {
        let ty = AbiType::tuple([
            AbiParam::new("amount", AbiType::Uint(256)),
            AbiParam::new("ids", AbiType::array(AbiType::Uint(8), 2)),
            AbiParam::new("tail", AbiType::slice(AbiType::Address)),
        ]);
        let zero = TypedValue::zero(&ty).unwrap();
        let sol = zero.to_sol_value().unwrap();
        assert_eq!(
            sol,
            DynSolValue::Tuple(vec![
                DynSolValue::Uint(U256::ZERO, 256),
                DynSolValue::FixedArray(vec![
                    DynSolValue::Uint(U256::ZERO, 8),
                    DynSolValue::Uint(U256::ZERO, 8),
                ]),
                DynSolValue::Array(vec![]),
            ])
        );
        assert!(TypedValue::zero(&AbiType::Hash).is_none());
    }

    #[test]
    fn fixed_bytes_zero_respects_word_size() {
        assert_eq!(
            TypedValue::zero(&AbiType::FixedBytes(MAX_FIXED_BYTES)),
            Some(TypedValue::FixedBytes(vec![0; MAX_FIXED_BYTES]))
        );
        assert!(TypedValue::zero(&AbiType::FixedBytes(MAX_FIXED_BYTES + 1)).is_none());
        assert!(TypedValue::zero(&AbiType::FixedBytes(0)).is_none());
    }

    #[test]
    fn fixed_length_check_recurses() {
        let ty = AbiType::slice(AbiType::array(AbiType::Bool, 2));
        let pair = TypedValue::FixedArray(vec![TypedValue::Bool(true), TypedValue::Bool(false)]);
        let single = TypedValue::FixedArray(vec![TypedValue::Bool(true)]);

        assert!(TypedValue::Array(vec![pair.clone(), pair.clone()]).matches_fixed_lengths(&ty));
        assert!(!TypedValue::Array(vec![pair, single]).matches_fixed_lengths(&ty));
        assert!(TypedValue::Array(vec![]).matches_fixed_lengths(&ty));
    }

    #[test]
    fn fill_skipped_replaces_nested_skips() {
        let ty = AbiType::tuple([
            AbiParam::new("flag", AbiType::Bool),
            AbiParam::new("to", AbiType::Address),
        ]);
        let value = TypedValue::Tuple(vec![
            ("flag".into(), TypedValue::Bool(true)),
            ("to".into(), TypedValue::Skip),
        ]);
        let filled = value.fill_skipped(&ty).unwrap();
        assert_eq!(
            filled,
            TypedValue::Tuple(vec![
                ("flag".into(), TypedValue::Bool(true)),
                ("to".into(), TypedValue::Address(Address::ZERO)),
            ])
        );
    }
}
