use thiserror::Error;

/// Primary error type for the Lattice value codec.
///
/// Every failure carries a status code from the store's RPC protocol
/// (see [`StatusCode`]). Failures raised while decoding a nested
/// structure are re-wrapped with positional context (array index, field
/// name) without discarding the inner error, so the outermost caller
/// sees both what failed overall and where inside the structure.
#[derive(Error, Debug)]
pub enum LatticeError {
    // === Preconditions on the wire data ===
    /// The wire type descriptor for a value is absent.
    #[error("unexpected missing wire type in decoding")]
    MissingType,

    /// A struct descriptor declares more fields than the row carries.
    #[error("unexpected missing wire value in decoding")]
    MissingValue,

    /// An ARRAY type descriptor has no element type.
    #[error("array type has no array element type")]
    MissingArrayElementType,

    /// A STRUCT type descriptor is absent where one is required.
    #[error("unexpected missing struct type in decoding STRUCT")]
    MissingStructType,

    /// A list value is absent where an ARRAY requires one. Arrays must
    /// be explicitly empty; absence is signaled by a NULL array value
    /// one level up, never by a missing list.
    #[error("unexpected missing list value in decoding {element_type} array")]
    MissingListValue { element_type: &'static str },

    /// The wire value's kind does not match what its type descriptor
    /// promised (e.g. a BOOL payload under a STRING descriptor).
    #[error("cannot use {got} value as {want} in decoding")]
    UnexpectedValueKind {
        got: &'static str,
        want: &'static str,
    },

    /// A string payload under a FLOAT64 descriptor that is none of the
    /// non-finite sentinels `"NaN"`, `"Infinity"`, `"-Infinity"`.
    #[error("unexpected string value {value:?} for number")]
    UnexpectedNumberString { value: String },

    /// A TIMESTAMP or DATE payload that failed to parse.
    #[error("{value:?} wasn't correctly encoded: {source}")]
    BadEncoding {
        value: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A list element that encodes neither a STRUCT row nor NULL.
    #[error("{kind} value does not encode a STRUCT")]
    NotAStruct { kind: &'static str },

    // === Destination/argument problems ===
    /// A wire NULL decoded into a destination with no way to represent
    /// absence.
    #[error("destination {dest} cannot support NULL values")]
    NullValue { dest: &'static str },

    /// Destination shape and wire type code disagree. `wire` is the
    /// offending code, formatted `ARRAY[element]` for arrays.
    #[error("type {dest} cannot be used for decoding {wire}")]
    TypeMismatch { dest: &'static str, wire: String },

    /// A struct descriptor field with an empty name.
    #[error("unnamed field {index} in struct descriptor")]
    UnnamedField { index: usize },

    /// The same field name appears twice in one struct descriptor.
    #[error("duplicated field name {name:?} in struct descriptor")]
    DuplicateWireField { name: String },

    /// The destination record has no member (or more than one member)
    /// resolving to a declared struct field name.
    #[error("record {record} has no or duplicate fields for struct field {field:?}")]
    NoOrDupRecordField { record: &'static str, field: String },

    /// A positional field index outside the record's member table.
    #[error("record {record} has no field at index {index}")]
    InvalidFieldIndex { record: &'static str, index: usize },

    /// Two members of one record shape resolve to the same wire name.
    /// Surfaced when the shape's field mapping is first built.
    #[error("record {record} has two fields resolving to name {name:?}")]
    DuplicateTagName { record: &'static str, name: String },

    /// Sparse decoding of unspecified-type values is owned by the
    /// session layer, not this codec.
    #[error("sparse decoding of unspecified-type values is not supported by the codec")]
    SparseDecodeUnsupported,

    // === Decoration wrappers ===
    /// Failure decoding one element of an ARRAY. Preserves the inner
    /// error and its status code.
    #[error("cannot decode array element {index} as {element_type}")]
    ArrayElement {
        index: usize,
        element_type: &'static str,
        #[source]
        source: Box<LatticeError>,
    },

    /// Failure decoding one field of a STRUCT. Preserves the inner
    /// error and its status code.
    #[error("cannot decode field {name:?} of struct")]
    StructField {
        name: String,
        #[source]
        source: Box<LatticeError>,
    },

    /// An error from outside the codec's own taxonomy, wrapped with
    /// context.
    #[error("{context}")]
    Unknown {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// RPC status codes used on the store's wire protocol.
///
/// These match the numeric values of the gRPC status code table; the
/// codec itself only ever produces a handful of them, but the full
/// table is kept so transport-level errors share one vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StatusCode {
    /// Not an error.
    Ok = 0,
    /// The operation was cancelled.
    Cancelled = 1,
    /// Unknown error, typically a wrapped foreign error.
    Unknown = 2,
    /// The caller supplied an invalid argument.
    InvalidArgument = 3,
    /// A deadline expired before the operation completed.
    DeadlineExceeded = 4,
    /// A requested entity was not found.
    NotFound = 5,
    /// An entity already exists.
    AlreadyExists = 6,
    /// Caller lacks permission.
    PermissionDenied = 7,
    /// A resource quota was exhausted.
    ResourceExhausted = 8,
    /// The system is not in a state required for the operation.
    FailedPrecondition = 9,
    /// Concurrency conflict; the operation was aborted.
    Aborted = 10,
    /// An operation ran past the valid range.
    OutOfRange = 11,
    /// The operation is not implemented or supported.
    Unimplemented = 12,
    /// Internal invariant broken.
    Internal = 13,
    /// The service is unavailable.
    Unavailable = 14,
    /// Unrecoverable data loss or corruption.
    DataLoss = 15,
    /// Missing or invalid authentication.
    Unauthenticated = 16,
}

impl LatticeError {
    /// Map this error to its wire status code.
    ///
    /// Decoration wrappers delegate to the error they wrap so nesting
    /// never launders the original classification.
    pub fn code(&self) -> StatusCode {
        match self {
            Self::MissingType
            | Self::MissingValue
            | Self::MissingArrayElementType
            | Self::MissingStructType
            | Self::MissingListValue { .. }
            | Self::UnexpectedValueKind { .. }
            | Self::UnexpectedNumberString { .. }
            | Self::BadEncoding { .. }
            | Self::NotAStruct { .. } => StatusCode::FailedPrecondition,
            Self::NullValue { .. }
            | Self::TypeMismatch { .. }
            | Self::UnnamedField { .. }
            | Self::DuplicateWireField { .. }
            | Self::NoOrDupRecordField { .. }
            | Self::InvalidFieldIndex { .. }
            | Self::DuplicateTagName { .. } => StatusCode::InvalidArgument,
            Self::SparseDecodeUnsupported => StatusCode::Unimplemented,
            Self::ArrayElement { source, .. } | Self::StructField { source, .. } => source.code(),
            Self::Unknown { .. } => StatusCode::Unknown,
        }
    }

    /// Create a null-into-non-nullable-destination error.
    pub const fn null_value(dest: &'static str) -> Self {
        Self::NullValue { dest }
    }

    /// Create a destination/wire type mismatch error.
    pub fn type_mismatch(dest: &'static str, wire: impl Into<String>) -> Self {
        Self::TypeMismatch {
            dest,
            wire: wire.into(),
        }
    }

    /// Create a bad-encoding error wrapping the underlying parse error.
    pub fn bad_encoding(
        value: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::BadEncoding {
            value: value.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a failure decoding array element `index`.
    ///
    /// Codec errors keep their own code; anything foreign is first
    /// wrapped as [`LatticeError::Unknown`].
    pub fn array_element(index: usize, element_type: &'static str, source: LatticeError) -> Self {
        Self::ArrayElement {
            index,
            element_type,
            source: Box::new(source),
        }
    }

    /// Wrap a failure decoding the named struct field.
    pub fn struct_field(name: impl Into<String>, source: LatticeError) -> Self {
        Self::StructField {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Wrap an error from outside the codec's taxonomy.
    pub fn unknown(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Unknown {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias using `LatticeError`.
pub type Result<T> = std::result::Result<T, LatticeError>;
