//! ABI type descriptors.
//!
//! [`AbiType`] is the schema the coercion engine is driven by. Descriptors are
//! usually built from alloy's JSON ABI parameters with
//! [`AbiParam::from_json_params`], or parsed from a type string with
//! [`AbiType::parse`].

use std::fmt;

use alloy::json_abi::Param;

use crate::error::SchemaError;
use crate::{MAX_FIXED_BYTES, MAX_INT_BITS};

/// Decimals of the bare `fixed`/`ufixed` aliases.
const DEFAULT_FIXED_DECIMALS: usize = 18;
/// Bit width of the bare `fixed`/`ufixed` aliases.
const DEFAULT_FIXED_BITS: usize = 128;
const MAX_FIXED_DECIMALS: usize = 80;

/// One target ABI type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    /// `intN`, N in 8..=256, step 8.
    Int(usize),
    /// `uintN`, N in 8..=256, step 8.
    Uint(usize),
    Bool,
    String,
    Address,
    /// Dynamic `bytes`.
    Bytes,
    /// `bytesN`, N in 1..=32.
    FixedBytes(usize),
    /// 24-byte `function` (address + selector).
    Function,
    Tuple(Vec<AbiParam>),
    /// Fixed-length `T[N]`.
    Array(Box<AbiType>, usize),
    /// Dynamic-length `T[]`.
    Slice(Box<AbiType>),
    /// `fixedMxN` / `ufixedMxN`. Declared by the ABI but never coerced.
    FixedPoint {
        signed: bool,
        bits: usize,
        decimals: usize,
    },
    /// Reserved hash kind. Never coerced.
    Hash,
}

/// A named ABI type: a function parameter or a tuple component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiParam {
    pub name: String,
    pub ty: AbiType,
}

impl AbiParam {
    pub fn new(name: impl Into<String>, ty: AbiType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Convert an alloy JSON ABI parameter, including nested tuple components.
    pub fn from_json_param(param: &Param) -> Result<Self, SchemaError> {
        let components = Self::from_json_params(&param.components)?;
        let ty = AbiType::parse_with_components(&param.ty, components)?;
        Ok(Self::new(param.name.clone(), ty))
    }

    pub fn from_json_params(params: &[Param]) -> Result<Vec<Self>, SchemaError> {
        params.iter().map(Self::from_json_param).collect()
    }
}

impl AbiType {
    pub fn tuple(fields: impl IntoIterator<Item = AbiParam>) -> Self {
        AbiType::Tuple(fields.into_iter().collect())
    }

    pub fn slice(elem: AbiType) -> Self {
        AbiType::Slice(Box::new(elem))
    }

    pub fn array(elem: AbiType, len: usize) -> Self {
        AbiType::Array(Box::new(elem), len)
    }

    /// Parse a type string such as `uint256`, `bytes32[]` or
    /// `(address,uint8[2])`. Tuple components parsed from parentheses are
    /// unnamed; use [`AbiParam::from_json_param`] to keep component names.
    pub fn parse(ty: &str) -> Result<Self, SchemaError> {
        Self::parse_with_components(ty, Vec::new())
    }

    /// Parse a type string whose innermost `tuple` takes `components`.
    pub fn parse_with_components(
        ty: &str,
        components: Vec<AbiParam>,
    ) -> Result<Self, SchemaError> {
        let ty = ty.trim();
        if let Some(body) = ty.strip_suffix(']') {
            let open = body
                .rfind('[')
                .ok_or_else(|| SchemaError::InvalidType(ty.to_string()))?;
            let elem = Self::parse_with_components(&body[..open], components)?;
            let dim = &body[open + 1..];
            if dim.is_empty() {
                return Ok(AbiType::slice(elem));
            }
            let len = dim
                .parse::<usize>()
                .map_err(|_| SchemaError::InvalidType(ty.to_string()))?;
            return Ok(AbiType::array(elem, len));
        }

        if ty == "tuple" {
            if components.is_empty() {
                return Err(SchemaError::EmptyTuple(ty.to_string()));
            }
            return Ok(AbiType::Tuple(components));
        }
        if let Some(inner) = ty.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            let fields = split_top_level(inner)
                .into_iter()
                .map(|part| Self::parse(part).map(|ty| AbiParam::new("", ty)))
                .collect::<Result<Vec<_>, _>>()?;
            if fields.is_empty() {
                return Err(SchemaError::EmptyTuple(ty.to_string()));
            }
            return Ok(AbiType::Tuple(fields));
        }

        parse_elementary(ty)
    }
}

fn parse_elementary(ty: &str) -> Result<AbiType, SchemaError> {
    match ty {
        "bool" => return Ok(AbiType::Bool),
        "string" => return Ok(AbiType::String),
        "address" => return Ok(AbiType::Address),
        "bytes" => return Ok(AbiType::Bytes),
        "function" => return Ok(AbiType::Function),
        "int" => return Ok(AbiType::Int(MAX_INT_BITS)),
        "uint" => return Ok(AbiType::Uint(MAX_INT_BITS)),
        "fixed" | "ufixed" => {
            return Ok(AbiType::FixedPoint {
                signed: ty == "fixed",
                bits: DEFAULT_FIXED_BITS,
                decimals: DEFAULT_FIXED_DECIMALS,
            });
        }
        _ => {}
    }

    if let Some(width) = ty.strip_prefix("uint") {
        return int_width(ty, width).map(AbiType::Uint);
    }
    if let Some(width) = ty.strip_prefix("int") {
        return int_width(ty, width).map(AbiType::Int);
    }
    if let Some(len) = ty.strip_prefix("bytes") {
        let len = parse_number(ty, len)?;
        if !(1..=MAX_FIXED_BYTES).contains(&len) {
            return Err(SchemaError::InvalidWidth(ty.to_string()));
        }
        return Ok(AbiType::FixedBytes(len));
    }
    let fixed = ty
        .strip_prefix("ufixed")
        .map(|rest| (false, rest))
        .or_else(|| ty.strip_prefix("fixed").map(|rest| (true, rest)));
    if let Some((signed, rest)) = fixed {
        let (bits, decimals) = rest
            .split_once('x')
            .ok_or_else(|| SchemaError::InvalidType(ty.to_string()))?;
        let bits = int_width(ty, bits)?;
        let decimals = parse_number(ty, decimals)?;
        if decimals > MAX_FIXED_DECIMALS {
            return Err(SchemaError::InvalidWidth(ty.to_string()));
        }
        return Ok(AbiType::FixedPoint {
            signed,
            bits,
            decimals,
        });
    }

    Err(SchemaError::InvalidType(ty.to_string()))
}

fn parse_number(ty: &str, digits: &str) -> Result<usize, SchemaError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SchemaError::InvalidType(ty.to_string()));
    }
    digits
        .parse()
        .map_err(|_| SchemaError::InvalidWidth(ty.to_string()))
}

fn int_width(ty: &str, digits: &str) -> Result<usize, SchemaError> {
    let bits = parse_number(ty, digits)?;
    if bits == 0 || bits > MAX_INT_BITS || bits % 8 != 0 {
        return Err(SchemaError::InvalidWidth(ty.to_string()));
    }
    Ok(bits)
}

/// Split a tuple body on commas outside nested parentheses.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    let last = s[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Int(bits) => write!(f, "int{bits}"),
            AbiType::Uint(bits) => write!(f, "uint{bits}"),
            AbiType::Bool => f.write_str("bool"),
            AbiType::String => f.write_str("string"),
            AbiType::Address => f.write_str("address"),
            AbiType::Bytes => f.write_str("bytes"),
            AbiType::FixedBytes(len) => write!(f, "bytes{len}"),
            AbiType::Function => f.write_str("function"),
            AbiType::Tuple(fields) => {
                f.write_str("(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", field.ty)?;
                }
                f.write_str(")")
            }
            AbiType::Array(elem, len) => write!(f, "{elem}[{len}]"),
            AbiType::Slice(elem) => write!(f, "{elem}[]"),
            AbiType::FixedPoint {
                signed,
                bits,
                decimals,
            } => {
                let prefix = if *signed { "fixed" } else { "ufixed" };
                write!(f, "{prefix}{bits}x{decimals}")
            }
            AbiType::Hash => f.write_str("hash"),
        }
    }
}
