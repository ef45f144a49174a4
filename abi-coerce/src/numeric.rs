//! Numeric coercion into fixed-width ABI integers.
//!
//! Every input is first normalized to a sign and a 256-bit magnitude, range
//! checked against the declared width, then narrowed. Widths of 8/16/32/64
//! bits produce native Rust integers; every other width produces a
//! width-checked 256-bit integer.

use std::fmt;

use alloy::primitives::{I256, Sign, U256};

use crate::error::{CoerceError, Result};
use crate::input::InputValue;
use crate::types::AbiType;
use crate::util::strip_hex_prefix;
use crate::MAX_INT_BITS;

/// Radix used to parse textual integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    Decimal,
    Hex,
}

impl Base {
    pub fn radix(self) -> u32 {
        match self {
            Base::Decimal => 10,
            Base::Hex => 16,
        }
    }

    /// Hex for `0x`-prefixed text, decimal for everything else.
    pub fn for_input(value: &InputValue) -> Self {
        match value.as_str() {
            Some(s) if strip_hex_prefix(s).is_some() => Base::Hex,
            _ => Base::Decimal,
        }
    }
}

/// A signed integer wider than 64 bits, or of a non-native width, whose value
/// is guaranteed to fit its declared width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WideInt {
    value: I256,
    bits: usize,
}

impl WideInt {
    pub fn new(value: I256, bits: usize) -> Option<Self> {
        let number = Number {
            negative: value.is_negative(),
            abs: value.unsigned_abs(),
        };
        (valid_width(bits) && number.fits_signed(bits)).then_some(Self { value, bits })
    }

    pub fn value(&self) -> I256 {
        self.value
    }

    pub fn bits(&self) -> usize {
        self.bits
    }
}

/// An unsigned counterpart of [`WideInt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WideUint {
    value: U256,
    bits: usize,
}

impl WideUint {
    pub fn new(value: U256, bits: usize) -> Option<Self> {
        (valid_width(bits) && value.bit_len() <= bits).then_some(Self { value, bits })
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn bits(&self) -> usize {
        self.bits
    }
}

/// Result of coercing to `intN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Wide(WideInt),
}

/// Result of coercing to `uintN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UintValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Wide(WideUint),
}

impl IntValue {
    pub fn bits(&self) -> usize {
        match self {
            IntValue::I8(_) => 8,
            IntValue::I16(_) => 16,
            IntValue::I32(_) => 32,
            IntValue::I64(_) => 64,
            IntValue::Wide(w) => w.bits(),
        }
    }

    pub fn to_i256(&self) -> I256 {
        let v = match self {
            IntValue::I8(v) => i64::from(*v),
            IntValue::I16(v) => i64::from(*v),
            IntValue::I32(v) => i64::from(*v),
            IntValue::I64(v) => *v,
            IntValue::Wide(w) => return w.value(),
        };
        let sign = if v < 0 { Sign::Negative } else { Sign::Positive };
        // |i64::MIN| = 2^63 always fits.
        I256::checked_from_sign_and_abs(sign, U256::from(v.unsigned_abs())).unwrap_or(I256::ZERO)
    }
}

impl UintValue {
    pub fn bits(&self) -> usize {
        match self {
            UintValue::U8(_) => 8,
            UintValue::U16(_) => 16,
            UintValue::U32(_) => 32,
            UintValue::U64(_) => 64,
            UintValue::Wide(w) => w.bits(),
        }
    }

    pub fn to_u256(&self) -> U256 {
        match self {
            UintValue::U8(v) => U256::from(*v),
            UintValue::U16(v) => U256::from(*v),
            UintValue::U32(v) => U256::from(*v),
            UintValue::U64(v) => U256::from(*v),
            UintValue::Wide(w) => w.value(),
        }
    }
}

impl fmt::Display for IntValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_i256())
    }
}

impl fmt::Display for UintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u256())
    }
}

/// Coerce `value` to `int{bits}`.
///
/// `base` applies to unprefixed text only: a `0x`/`0X` prefix always selects
/// base 16.
pub fn coerce_int(value: &InputValue, base: Base, bits: usize) -> Result<IntValue> {
    let ty = AbiType::Int(bits);
    if !valid_width(bits) {
        return Err(CoerceError::UnsupportedKind(ty.to_string()));
    }
    let number = Number::from_input(value, base, &ty)?;
    if !number.fits_signed(bits) {
        return Err(CoerceError::out_of_range(number, ty));
    }

    let narrow = |n: &Number| -> Result<i64> {
        let abs = u64::try_from(n.abs).map_err(|_| CoerceError::out_of_range(n, &ty))?;
        let v = if n.negative {
            -i128::from(abs)
        } else {
            i128::from(abs)
        };
        i64::try_from(v).map_err(|_| CoerceError::out_of_range(n, &ty))
    };
    let range = || CoerceError::out_of_range(&number, &ty);

    Ok(match bits {
        8 => IntValue::I8(i8::try_from(narrow(&number)?).map_err(|_| range())?),
        16 => IntValue::I16(i16::try_from(narrow(&number)?).map_err(|_| range())?),
        32 => IntValue::I32(i32::try_from(narrow(&number)?).map_err(|_| range())?),
        64 => IntValue::I64(narrow(&number)?),
        _ => {
            let sign = if number.negative {
                Sign::Negative
            } else {
                Sign::Positive
            };
            let value = I256::checked_from_sign_and_abs(sign, number.abs).ok_or_else(range)?;
            IntValue::Wide(WideInt::new(value, bits).ok_or_else(range)?)
        }
    })
}

/// Coerce `value` to `uint{bits}`. Negative inputs always fail.
pub fn coerce_uint(value: &InputValue, base: Base, bits: usize) -> Result<UintValue> {
    let ty = AbiType::Uint(bits);
    if !valid_width(bits) {
        return Err(CoerceError::UnsupportedKind(ty.to_string()));
    }
    let number = Number::from_input(value, base, &ty)?;
    if !number.fits_unsigned(bits) {
        return Err(CoerceError::out_of_range(number, ty));
    }

    let range = || CoerceError::out_of_range(&number, &ty);
    Ok(match bits {
        8 => UintValue::U8(u8::try_from(number.abs).map_err(|_| range())?),
        16 => UintValue::U16(u16::try_from(number.abs).map_err(|_| range())?),
        32 => UintValue::U32(u32::try_from(number.abs).map_err(|_| range())?),
        64 => UintValue::U64(u64::try_from(number.abs).map_err(|_| range())?),
        _ => UintValue::Wide(WideUint::new(number.abs, bits).ok_or_else(range)?),
    })
}

fn valid_width(bits: usize) -> bool {
    bits > 0 && bits <= MAX_INT_BITS && bits % 8 == 0
}

/// Sign and magnitude of any accepted numeric input.
#[derive(Debug, Clone, Copy)]
struct Number {
    negative: bool,
    abs: U256,
}

impl Number {
    fn from_input(value: &InputValue, base: Base, ty: &AbiType) -> Result<Self> {
        let number = match value.deref_optional() {
            InputValue::Str(s) => return Self::parse(s, base, ty),
            InputValue::Int(v) => Number {
                negative: *v < 0,
                abs: U256::from(v.unsigned_abs()),
            },
            InputValue::Uint(v) => Number {
                negative: false,
                abs: U256::from(*v),
            },
            InputValue::Float(f) => return Self::from_float(*f, ty),
            InputValue::BigInt(v) => Number {
                negative: v.is_negative(),
                abs: v.unsigned_abs(),
            },
            InputValue::BigUint(v) => Number {
                negative: false,
                abs: *v,
            },
            other => return Err(CoerceError::mismatch(ty, other.kind())),
        };
        Ok(number)
    }

    /// Floats are truncated toward zero.
    fn from_float(f: f64, ty: &AbiType) -> Result<Self> {
        if !f.is_finite() {
            return Err(CoerceError::out_of_range(f, ty));
        }
        let truncated = f.trunc();
        let abs = truncated.abs();
        if abs >= u128::MAX as f64 {
            return Err(CoerceError::out_of_range(f, ty));
        }
        Ok(Number {
            negative: truncated < 0.0,
            abs: U256::from(abs as u128),
        })
    }

    fn parse(text: &str, base: Base, ty: &AbiType) -> Result<Self> {
        let (body, radix) = match strip_hex_prefix(text) {
            Some(rest) => (rest, Base::Hex.radix()),
            None => (text, base.radix()),
        };
        let (negative, digits) = match body.as_bytes().first() {
            Some(b'-') => (true, &body[1..]),
            Some(b'+') => (false, &body[1..]),
            _ => (false, body),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(CoerceError::InvalidNumber {
                text: text.to_string(),
                base: radix,
            });
        }
        let abs = U256::from_str_radix(digits, u64::from(radix))
            .map_err(|_| CoerceError::out_of_range(text, ty))?;
        Ok(Number { negative, abs })
    }

    fn fits_signed(&self, bits: usize) -> bool {
        let limit = U256::from(1u8) << (bits - 1);
        if self.negative {
            self.abs <= limit
        } else {
            self.abs < limit
        }
    }

    fn fits_unsigned(&self, bits: usize) -> bool {
        (!self.negative || self.abs.is_zero()) && self.abs.bit_len() <= bits
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative && !self.abs.is_zero() {
            f.write_str("-")?;
        }
        write!(f, "{}", self.abs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint(value: impl Into<InputValue>, bits: usize) -> Result<UintValue> {
        coerce_uint(&value.into(), Base::Decimal, bits)
    }

    fn int(value: impl Into<InputValue>, bits: usize) -> Result<IntValue> {
        coerce_int(&value.into(), Base::Decimal, bits)
    }

    #[test]
    fn uint_bounds_for_native_widths() {
        for bits in (8..=64).step_by(8) {
            let max = if bits == 64 {
                u64::MAX
            } else {
                (1u64 << bits) - 1
            };
            assert!(uint(max, bits).is_ok(), "max for uint{bits}");
            assert!(uint(0u64, bits).is_ok(), "zero for uint{bits}");
            let over = (u128::from(max) + 1).to_string();
            assert!(
                matches!(uint(over, bits), Err(CoerceError::OutOfRange { .. })),
                "overflow for uint{bits}"
            );
        }
    }

    #[test]
    fn int_bounds_for_native_widths() {
        for bits in (8..=64).step_by(8) {
            let max = (1i128 << (bits - 1)) - 1;
            let min = -(1i128 << (bits - 1));
            assert!(int(max.to_string(), bits).is_ok(), "max for int{bits}");
            assert!(int(min.to_string(), bits).is_ok(), "min for int{bits}");
            assert!(int((max + 1).to_string(), bits).is_err(), "max+1 for int{bits}");
            assert!(int((min - 1).to_string(), bits).is_err(), "min-1 for int{bits}");
        }
    }

    #[test]
    fn native_widths_produce_native_values() {
        assert_eq!(uint(255u8, 8).unwrap(), UintValue::U8(255));
        assert_eq!(uint("65535", 16).unwrap(), UintValue::U16(65535));
        assert_eq!(int(-128i16, 8).unwrap(), IntValue::I8(-128));
        assert_eq!(int(i64::MIN, 64).unwrap(), IntValue::I64(i64::MIN));
        assert!(matches!(uint(7u8, 24).unwrap(), UintValue::Wide(w) if w.bits() == 24));
    }

    #[test]
    fn hex_prefix_overrides_base() {
        let v = coerce_uint(&InputValue::from("0x10"), Base::Decimal, 8).unwrap();
        assert_eq!(v, UintValue::U8(16));
        let v = coerce_uint(&InputValue::from("0XfF"), Base::Decimal, 8).unwrap();
        assert_eq!(v, UintValue::U8(255));
        let v = coerce_uint(&InputValue::from("10"), Base::Hex, 8).unwrap();
        assert_eq!(v, UintValue::U8(16));
        assert!(matches!(
            coerce_uint(&InputValue::from("ff"), Base::Decimal, 8),
            Err(CoerceError::InvalidNumber { base: 10, .. })
        ));
    }

    #[test]
    fn unsigned_rejects_negative_inputs() {
        assert!(uint(-1i32, 64).is_err());
        assert!(uint("-1", 256).is_err());
        assert!(uint(-0.5f64, 8).is_ok()); // truncates to zero
        assert!(uint(-1.5f64, 8).is_err());
        assert!(uint(I256::MINUS_ONE, 128).is_err());
    }

    #[test]
    fn floats_truncate_toward_zero() {
        assert_eq!(uint(3.99f64, 8).unwrap(), UintValue::U8(3));
        assert_eq!(int(-3.99f64, 8).unwrap(), IntValue::I8(-3));
        assert!(uint(f64::NAN, 8).is_err());
        assert!(int(f64::INFINITY, 256).is_err());
    }

    #[test]
    fn wide_widths_are_enforced() {
        let max_u128 = U256::from(u128::MAX);
        assert!(uint(max_u128, 128).is_ok());
        assert!(uint(max_u128 + U256::from(1u8), 128).is_err());
        assert!(uint(U256::MAX, 256).is_ok());

        let limit = U256::from(1u8) << 255usize;
        assert!(int(format!("-{limit}"), 256).is_ok());
        assert!(int(limit.to_string(), 256).is_err());
        assert!(int(format!("0x{}", "f".repeat(65)), 256).is_err());
    }

    #[test]
    fn rejects_unsupported_inputs() {
        assert!(matches!(
            uint(true, 8),
            Err(CoerceError::TypeMismatch { found: "bool", .. })
        ));
        assert!(uint("", 8).is_err());
        assert!(uint("0x", 8).is_err());
        assert!(uint("1_000", 64).is_err());
    }

    #[test]
    fn wide_constructors_check_width() {
        assert!(WideUint::new(U256::from(256u16), 8).is_none());
        assert!(WideUint::new(U256::from(255u16), 8).is_some());
        assert!(WideInt::new(I256::MINUS_ONE, 8).is_some());
        assert!(WideInt::new(I256::MIN, 248).is_none());
        assert!(WideUint::new(U256::ZERO, 12).is_none());
    }
}
