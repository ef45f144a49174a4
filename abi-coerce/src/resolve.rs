//! Field resolution: locating the input value for a named ABI field.

use crate::error::{CoerceError, Result};
use crate::input::{InputValue, Record};
use crate::util::to_camel_case;

/// Something a named field can be looked up in.
pub trait FieldSource {
    fn lookup(&self, name: &str) -> Option<&InputValue>;
}

/// Record fields match on their camel-case form, so `min_amount_out`,
/// `minAmountOut` and `MinAmountOut` all name the same field.
impl FieldSource for Record {
    fn lookup(&self, name: &str) -> Option<&InputValue> {
        let wanted = to_camel_case(name);
        self.fields()
            .iter()
            .find(|(field, _)| to_camel_case(field) == wanted)
            .map(|(_, value)| value)
    }
}

/// Map keys match exactly; the first matching entry wins.
impl FieldSource for [(String, InputValue)] {
    fn lookup(&self, name: &str) -> Option<&InputValue> {
        self.iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// Outcome of resolving a field name against a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Value(&'a InputValue),
    /// The input marks this field as absent; it is skipped, not failed.
    NotApplicable,
    /// A required field is missing from the input.
    Missing,
}

impl<'a> Resolved<'a> {
    /// `Ok(None)` for not-applicable, an unresolved-field error for a miss.
    pub fn into_result(self, name: &str) -> Result<Option<&'a InputValue>> {
        match self {
            Resolved::Value(v) => Ok(Some(v)),
            Resolved::NotApplicable => Ok(None),
            Resolved::Missing => Err(CoerceError::UnresolvedField(name.to_string())),
        }
    }
}

/// Resolve `name` against `container`.
///
/// An empty name selects the container itself. Records and maps are searched
/// through [`FieldSource`]; an opaque container makes every named field not
/// applicable; any other shape resolves to the container itself. A resolved
/// null optional is not applicable, and non-null optionals are unwrapped.
pub fn resolve<'a>(name: &str, container: &'a InputValue) -> Resolved<'a> {
    let value = if name.is_empty() {
        container
    } else {
        let found = match container.deref_optional() {
            InputValue::Record(record) => record.lookup(name),
            InputValue::Map(entries) => entries.as_slice().lookup(name),
            InputValue::Opaque => return Resolved::NotApplicable,
            other => Some(other),
        };
        match found {
            Some(value) => value,
            None => return Resolved::Missing,
        }
    };

    match value.deref_optional() {
        InputValue::Optional(None) => Resolved::NotApplicable,
        value => Resolved::Value(value),
    }
}
