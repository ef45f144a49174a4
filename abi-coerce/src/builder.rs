//! Argument list construction: the public entry point of the engine.

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::Function;
use tracing::{debug, trace};

use crate::composite::map_field;
use crate::config::{ArgsConfig, SkipPolicy};
use crate::error::{ArgumentError, CoerceError, EncodeError, Result};
use crate::input::InputValue;
use crate::types::{AbiParam, AbiType};
use crate::value::TypedValue;

/// Typed arguments, index-aligned with the parameters they were built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentList {
    names: Vec<String>,
    types: Vec<AbiType>,
    values: Vec<TypedValue>,
}

impl ArgumentList {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[TypedValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&TypedValue> {
        self.values.get(index)
    }

    /// `(parameter name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.names.iter().map(String::as_str).zip(&self.values)
    }

    pub fn into_values(self) -> Vec<TypedValue> {
        self.values
    }

    /// True if any argument, at any depth, is a skip marker.
    pub fn has_skipped(&self) -> bool {
        self.values.iter().any(TypedValue::contains_skip)
    }

    /// Declared type of each argument.
    pub fn types(&self) -> &[AbiType] {
        &self.types
    }

    /// Convert every argument to alloy's dynamic value, checking fixed-length
    /// arrays against their declared `T[N]`.
    pub fn to_sol_values(&self) -> Result<Vec<DynSolValue>, EncodeError> {
        self.names
            .iter()
            .zip(&self.types)
            .zip(&self.values)
            .enumerate()
            .map(|(index, ((name, ty), value))| {
                let sol = value.to_sol_value().ok_or_else(|| {
                    let name = name.clone();
                    if value.is_skip() {
                        EncodeError::Skipped { index, name }
                    } else {
                        EncodeError::NestedSkip { index, name }
                    }
                })?;
                if !value.matches_fixed_lengths(ty) {
                    return Err(EncodeError::FixedLengthMismatch {
                        index,
                        name: name.clone(),
                        ty: ty.to_string(),
                    });
                }
                Ok(sol)
            })
            .collect()
    }

    /// ABI-encode the arguments as a parameter list (no selector).
    pub fn abi_encode(&self) -> Result<Vec<u8>, EncodeError> {
        Ok(DynSolValue::Tuple(self.to_sol_values()?).abi_encode_params())
    }
}

/// Build the argument list for `params` from `input`, using the environment
/// configuration from [`ArgsConfig::load`].
pub fn build_args(params: &[AbiParam], input: &InputValue) -> Result<ArgumentList, ArgumentError> {
    build_args_with(params, input, ArgsConfig::load())
}

/// Build the argument list for `params` from `input`.
///
/// Parameters are processed in order and the first failure aborts the whole
/// call; no partial list is returned.
pub fn build_args_with(
    params: &[AbiParam],
    input: &InputValue,
    config: &ArgsConfig,
) -> Result<ArgumentList, ArgumentError> {
    let mut names = Vec::with_capacity(params.len());
    let mut types = Vec::with_capacity(params.len());
    let mut values = Vec::with_capacity(params.len());

    for (index, param) in params.iter().enumerate() {
        let value = map_field(&param.name, &param.ty, input)
            .and_then(|value| apply_skip_policy(index, param, value, config.skip_policy))
            .map_err(|source| {
                debug!(
                    index,
                    name = %param.name,
                    ty = %param.ty,
                    "failed to build argument: {source}"
                );
                ArgumentError {
                    index,
                    name: param.name.clone(),
                    ty: param.ty.to_string(),
                    source,
                }
            })?;
        names.push(param.name.clone());
        types.push(param.ty.clone());
        values.push(value);
    }

    Ok(ArgumentList {
        names,
        types,
        values,
    })
}

fn apply_skip_policy(
    index: usize,
    param: &AbiParam,
    value: TypedValue,
    policy: SkipPolicy,
) -> Result<TypedValue> {
    if !value.contains_skip() {
        return Ok(value);
    }
    trace!(index, name = %param.name, %policy, "argument holds a skipped value");
    match policy {
        SkipPolicy::Keep => Ok(value),
        SkipPolicy::Reject => Err(CoerceError::UnresolvedField(param.name.clone())),
        SkipPolicy::Zero => value
            .fill_skipped(&param.ty)
            .ok_or_else(|| CoerceError::UnsupportedKind(param.ty.to_string())),
    }
}

/// Encode a call to `function`: its 4-byte selector followed by the
/// arguments built from `input`.
pub fn encode_call(function: &Function, input: &InputValue) -> Result<Vec<u8>, EncodeError> {
    let params = AbiParam::from_json_params(&function.inputs)?;
    let args = build_args(&params, input)?;
    let mut calldata = function.selector().to_vec();
    calldata.extend(args.abi_encode()?);
    Ok(calldata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};

    fn params() -> Vec<AbiParam> {
        vec![
            AbiParam::new("amount", AbiType::Uint(256)),
            AbiParam::new("to", AbiType::Address),
        ]
    }

    fn with_policy(policy: SkipPolicy) -> ArgsConfig {
        ArgsConfig::new(policy)
    }

    #[test]
    fn builds_index_aligned_list() {
        let input = InputValue::map([
            ("to", InputValue::from(Address::repeat_byte(1))),
            ("amount", InputValue::from("42")),
        ]);
        let args = build_args_with(&params(), &input, &ArgsConfig::default()).unwrap();
        let names: Vec<_> = args.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["amount", "to"]);
        assert_eq!(
            args.to_sol_values().unwrap(),
            vec![
                DynSolValue::Uint(U256::from(42), 256),
                DynSolValue::Address(Address::repeat_byte(1)),
            ]
        );
    }

    #[test]
    fn failure_names_the_first_bad_parameter() {
        let input = InputValue::map([("amount", "-1"), ("to", "nope")]);
        let err = build_args_with(&params(), &input, &ArgsConfig::default()).unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(err.name, "amount");
        assert_eq!(err.ty, "uint256");
        assert!(matches!(err.source, CoerceError::OutOfRange { .. }));
    }

    #[test]
    fn missing_parameter_is_unresolved() {
        let input = InputValue::map([("amount", 1u8)]);
        let err = build_args_with(&params(), &input, &ArgsConfig::default()).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.source, CoerceError::UnresolvedField("to".into()));
    }

    #[test]
    fn keep_policy_leaves_skip_in_place() {
        let input = InputValue::map([("amount", InputValue::from(1u8)), ("to", InputValue::null())]);
        let args = build_args_with(&params(), &input, &with_policy(SkipPolicy::Keep)).unwrap();
        assert_eq!(args.get(1), Some(&TypedValue::Skip));
        assert!(args.has_skipped());
        assert_eq!(
            args.abi_encode(),
            Err(EncodeError::Skipped {
                index: 1,
                name: "to".into()
            })
        );
    }

    #[test]
    fn reject_policy_fails_on_skip() {
        let input = InputValue::map([("amount", InputValue::from(1u8)), ("to", InputValue::null())]);
        let err = build_args_with(&params(), &input, &with_policy(SkipPolicy::Reject)).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.source, CoerceError::UnresolvedField("to".into()));
    }

    #[test]
    fn zero_policy_fills_declared_zero() {
        let input = InputValue::map([("amount", InputValue::from(1u8)), ("to", InputValue::null())]);
        let args = build_args_with(&params(), &input, &with_policy(SkipPolicy::Zero)).unwrap();
        assert_eq!(args.get(1), Some(&TypedValue::Address(Address::ZERO)));
        assert!(!args.has_skipped());
        assert!(args.abi_encode().is_ok());
    }

    #[test]
    fn zero_policy_cannot_fill_reserved_kinds() {
        let params = [AbiParam::new("h", AbiType::Hash)];
        let input = InputValue::map([("h", InputValue::null())]);
        let err = build_args_with(&params, &input, &with_policy(SkipPolicy::Zero)).unwrap_err();
        assert!(matches!(err.source, CoerceError::UnsupportedKind(_)));
    }

    #[test]
    fn zero_policy_cannot_fill_oversized_fixed_bytes() {
        let params = [AbiParam::new("blob", AbiType::FixedBytes(33))];
        let input = InputValue::map([("blob", InputValue::null())]);
        let err = build_args_with(&params, &input, &with_policy(SkipPolicy::Zero)).unwrap_err();
        assert_eq!(err.source, CoerceError::UnsupportedKind("bytes33".into()));
    }

    #[test]
    fn short_fixed_array_is_rejected_on_encode() {
        let params = [
            AbiParam::new("deadlines", AbiType::array(AbiType::Uint(64), 2)),
            AbiParam::new("flag", AbiType::Bool),
        ];
        let input = InputValue::map([
            ("deadlines", InputValue::list([7u64])),
            ("flag", InputValue::from(true)),
        ]);
        let args = build_args_with(&params, &input, &ArgsConfig::default()).unwrap();
        assert_eq!(args.types()[0].to_string(), "uint64[2]");
        assert_eq!(
            args.abi_encode(),
            Err(EncodeError::FixedLengthMismatch {
                index: 0,
                name: "deadlines".into(),
                ty: "uint64[2]".into(),
            })
        );
    }

    #[test]
    fn nested_skip_is_reported_on_encode() {
        let params = [AbiParam::new("ids", AbiType::slice(AbiType::Uint(8)))];
        let input = InputValue::map([("ids", InputValue::list([Some(1u8), None]))]);
        let args = build_args_with(&params, &input, &ArgsConfig::default()).unwrap();
        assert_eq!(
            args.to_sol_values(),
            Err(EncodeError::NestedSkip {
                index: 0,
                name: "ids".into()
            })
        );
    }

    #[test]
    fn empty_schema_builds_empty_list() {
        let args = build_args_with(&[], &InputValue::Opaque, &ArgsConfig::default()).unwrap();
        assert!(args.is_empty());
        assert_eq!(args.abi_encode().unwrap(), Vec::<u8>::new());
    }
}
