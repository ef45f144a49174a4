use thiserror::Error;

/// Why a single value could not be coerced to its declared ABI type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    /// A named field is declared by the schema but absent from the input.
    #[error("field `{0}` not found in input")]
    UnresolvedField(String),
    /// The resolved value has the wrong shape, length or kind for the type.
    #[error("cannot coerce {found} to {expected}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },
    /// A numeric value does not fit the declared width.
    #[error("value {value} out of range for {ty}")]
    OutOfRange { value: String, ty: String },
    /// Text that is not a number in the requested base.
    #[error("invalid base-{base} integer `{text}`")]
    InvalidNumber { text: String, base: u32 },
    /// Reserved kinds that are declared but never coerced.
    #[error("unsupported ABI type {0}")]
    UnsupportedKind(String),
    /// Failure inside a tuple field.
    #[error("field `{field}`: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<CoerceError>,
    },
    /// Failure inside an array element.
    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<CoerceError>,
    },
}

impl CoerceError {
    pub fn mismatch(expected: impl ToString, found: &'static str) -> Self {
        CoerceError::TypeMismatch {
            expected: expected.to_string(),
            found,
        }
    }

    pub fn out_of_range(value: impl ToString, ty: impl ToString) -> Self {
        CoerceError::OutOfRange {
            value: value.to_string(),
            ty: ty.to_string(),
        }
    }

    pub(crate) fn in_field(self, field: &str) -> Self {
        CoerceError::Field {
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_element(self, index: usize) -> Self {
        CoerceError::Element {
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, with tuple/array context stripped.
    pub fn root_cause(&self) -> &CoerceError {
        match self {
            CoerceError::Field { source, .. } | CoerceError::Element { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

/// Top-level failure: the first parameter of the schema that could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to build argument {index} `{name}` of type {ty}: {source}")]
pub struct ArgumentError {
    pub index: usize,
    pub name: String,
    pub ty: String,
    #[source]
    pub source: CoerceError,
}

/// A type string or JSON ABI parameter that does not describe a valid ABI type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid ABI type `{0}`")]
    InvalidType(String),
    #[error("invalid width in ABI type `{0}`")]
    InvalidWidth(String),
    #[error("tuple type `{0}` has no components")]
    EmptyTuple(String),
}

/// Failures on the way from input to encoded calldata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A skipped parameter was left in the list.
    #[error("argument {index} `{name}` was skipped and has no value to encode")]
    Skipped { index: usize, name: String },
    /// A skipped value nested inside a tuple or array.
    #[error("skipped value inside argument {index} `{name}`")]
    NestedSkip { index: usize, name: String },
    /// A fixed-length array whose element count differs from its declared `T[N]`.
    #[error("argument {index} `{name}` does not have the fixed lengths of {ty}")]
    FixedLengthMismatch {
        index: usize,
        name: String,
        ty: String,
    },
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub type Result<T, E = CoerceError> = std::result::Result<T, E>;
