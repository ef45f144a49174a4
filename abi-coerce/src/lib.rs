//! Type-directed coercion of untyped values into Solidity ABI arguments.
//!
//! Callers hand over a schema (an ordered list of named ABI parameters) and one
//! loosely-typed [`InputValue`]. The engine walks the schema, locates the value
//! for every parameter, converts it to the exact ABI representation and checks
//! its bounds. The resulting [`ArgumentList`] can be handed to alloy's dynamic
//! ABI encoder.
//!
//! Pipeline, per parameter:
//!
//! - [`resolve`]: find the value for a field name inside a record, a map, or
//!   the container itself.
//! - [`composite`]: tuples and arrays, recursing back through the resolver.
//! - [`scalar`]: bool, string, address, bytes, fixed bytes, function selectors.
//! - [`numeric`]: signed/unsigned integers of every declared width.

pub mod builder;
pub mod composite;
pub mod config;
pub mod error;
pub mod input;
pub mod numeric;
pub mod resolve;
pub mod scalar;
pub mod types;
pub mod util;
pub mod value;

pub use builder::{ArgumentList, build_args, build_args_with, encode_call};
pub use config::{ArgsConfig, SkipPolicy};
pub use error::{ArgumentError, CoerceError, EncodeError, SchemaError};
pub use input::{InputValue, Record};
pub use numeric::{Base, IntValue, UintValue};
pub use resolve::{FieldSource, Resolved};
pub use types::{AbiParam, AbiType};
pub use value::TypedValue;

/// Byte length of an EVM address.
pub const ADDRESS_LENGTH: usize = 20;
/// Byte length of an ABI `function` value (address followed by selector).
pub const FUNCTION_LENGTH: usize = 24;
/// Longest string, in UTF-8 bytes, accepted for a `string` parameter.
pub const MAX_STRING_BYTES: usize = 32;
/// Widest integer type the ABI declares.
pub const MAX_INT_BITS: usize = 256;
/// Longest `bytesN` type the ABI declares.
pub const MAX_FIXED_BYTES: usize = 32;
