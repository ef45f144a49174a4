//! Tuples and arrays: the recursive half of the mapping pipeline.

use crate::error::{CoerceError, Result};
use crate::input::InputValue;
use crate::resolve::{Resolved, resolve};
use crate::scalar::map_scalar;
use crate::types::{AbiParam, AbiType};
use crate::value::TypedValue;

/// Map an already resolved value onto any ABI type.
pub fn map_value(ty: &AbiType, value: &InputValue) -> Result<TypedValue> {
    match ty {
        AbiType::Tuple(fields) => map_tuple(fields, value),
        AbiType::Array(elem, _) => map_sequence(elem, value).map(TypedValue::FixedArray),
        AbiType::Slice(elem) => map_sequence(elem, value).map(TypedValue::Array),
        _ => map_scalar(ty, value),
    }
}

/// Resolve `name` in `container` and map the result. Not-applicable values
/// come back as [`TypedValue::Skip`].
pub fn map_field(name: &str, ty: &AbiType, container: &InputValue) -> Result<TypedValue> {
    match resolve(name, container) {
        Resolved::Value(value) => map_value(ty, value),
        Resolved::NotApplicable => Ok(TypedValue::Skip),
        Resolved::Missing => Err(CoerceError::UnresolvedField(name.to_string())),
    }
}

/// Build a tuple by resolving every declared field in `value`.
pub fn map_tuple(fields: &[AbiParam], value: &InputValue) -> Result<TypedValue> {
    fields
        .iter()
        .map(|field| {
            map_field(&field.name, &field.ty, value)
                .map(|mapped| (field.name.clone(), mapped))
                .map_err(|err| err.in_field(&field.name))
        })
        .collect::<Result<Vec<_>>>()
        .map(TypedValue::Tuple)
}

/// Map every element of a list-shaped input. The output always has the
/// input's length; `T[N]` length agreement is left to the encoder.
fn map_sequence(elem: &AbiType, value: &InputValue) -> Result<Vec<TypedValue>> {
    let map_item = |(index, item): (usize, &InputValue)| {
        let mapped = match elem {
            AbiType::Tuple(fields) => map_tuple(fields, item),
            _ => map_field("", elem, item),
        };
        mapped.map_err(|err| err.in_element(index))
    };

    match value.deref_optional() {
        InputValue::List(items) => items.iter().enumerate().map(map_item).collect(),
        InputValue::Bytes(bytes) | InputValue::ByteArray(bytes) => bytes
            .iter()
            .map(|&b| InputValue::from(b))
            .enumerate()
            .map(|(index, item)| map_item((index, &item)))
            .collect(),
        other => Err(CoerceError::mismatch(
            AbiType::slice(elem.clone()),
            other.kind(),
        )),
    }
}
