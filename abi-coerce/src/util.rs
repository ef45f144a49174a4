//! Stateless string helpers shared by the mappers.

use crate::ADDRESS_LENGTH;

/// Returns true if `s` starts with `0x` or `0X`.
pub fn has_hex_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X')
}

/// Strips a leading `0x`/`0X`, returning `None` when there is none.
pub fn strip_hex_prefix(s: &str) -> Option<&str> {
    if has_hex_prefix(s) { Some(&s[2..]) } else { None }
}

/// Decodes the hex digits following a `0x` prefix.
///
/// Returns `None` for unprefixed input, odd-length digits or non-hex characters.
pub fn decode_prefixed_hex(s: &str) -> Option<Vec<u8>> {
    hex::decode(strip_hex_prefix(s)?).ok()
}

/// Checks the textual address syntax: optional `0x`/`0X` prefix followed by
/// exactly 40 hex digits.
pub fn is_hex_address(s: &str) -> bool {
    let digits = strip_hex_prefix(s).unwrap_or(s);
    digits.len() == 2 * ADDRESS_LENGTH && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Converts a snake_case (or already camelCase) identifier into the
/// UpperCamelCase form used for record field lookup.
///
/// Every `_`-separated part gets its first character upper-cased; the rest of
/// each part is kept as written. Empty parts are dropped.
///
/// ```
/// use abi_coerce::util::to_camel_case;
///
/// assert_eq!(to_camel_case("amount"), "Amount");
/// assert_eq!(to_camel_case("min_amount_out"), "MinAmountOut");
/// assert_eq!(to_camel_case("tokenIn"), "TokenIn");
/// ```
pub fn to_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for part in input.split('_') {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
