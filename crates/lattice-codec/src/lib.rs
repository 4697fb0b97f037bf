//! Bidirectional codec between native Rust values and the Lattice
//! store's self-describing wire values.
//!
//! Decode direction is wire→native: a [`WireValue`] paired with its
//! [`WireType`] descriptor is written into a `&mut` destination of one
//! of the supported native shapes. Encode direction is native→wire: a
//! native value produces a wire value plus an inferred descriptor.
//! Array and struct decoding are built on top of the scalar codec; the
//! field-tag resolver and its process-lifetime cache are consumed only
//! by the struct codec.
//!
//! The supported native shapes form a closed set — [`FromWire`] and
//! [`ToWire`] are sealed. Anything outside the table is rejected,
//! never guessed at. Struct destinations implement [`Record`],
//! normally via `#[derive(Record)]` from `lattice-derive`.

pub mod array;
pub mod decode;
pub mod encode;
pub mod fields;
pub mod generic;
pub mod record;
pub mod structs;

pub use array::{
    decode_bool_array, decode_bytes_array, decode_date_array, decode_float64_array,
    decode_int64_array, decode_row_array, decode_string_array, decode_timestamp_array,
};
pub use decode::{decode_optional_value, decode_value, FromWire};
pub use encode::{encode_value, encode_value_array, ToWire, Value};
pub use fields::{FieldCache, ResolvedFields, TagMode};
pub use generic::GenericColumnValue;
pub use record::{FieldSpec, Record};
pub use structs::{decode_row, decode_struct, decode_struct_array, decode_struct_in};

pub use lattice_error::{LatticeError, Result, StatusCode};
pub use lattice_types::{
    NullBool, NullDate, NullFloat64, NullInt64, NullRow, NullString, NullTimestamp, Row,
    StructField, StructType, TypeCode, WireType, WireValue,
};

/// Seals [`FromWire`] and [`ToWire`] to the enumerated set of native
/// shapes. Adding a shape means adding an impl here, not subclassing.
mod sealed {
    use chrono::{DateTime, NaiveDate, Utc};
    use lattice_types::{
        NullBool, NullDate, NullFloat64, NullInt64, NullRow, NullString, NullTimestamp,
    };

    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for bool {}
    impl Sealed for DateTime<Utc> {}
    impl Sealed for NaiveDate {}
    impl Sealed for Vec<u8> {}

    impl Sealed for NullString {}
    impl Sealed for NullInt64 {}
    impl Sealed for NullFloat64 {}
    impl Sealed for NullBool {}
    impl Sealed for NullTimestamp {}
    impl Sealed for NullDate {}

    impl Sealed for Vec<String> {}
    impl Sealed for Vec<i64> {}
    impl Sealed for Vec<f64> {}
    impl Sealed for Vec<bool> {}
    impl Sealed for Vec<DateTime<Utc>> {}
    impl Sealed for Vec<NaiveDate> {}
    impl Sealed for Vec<Vec<u8>> {}

    impl Sealed for Vec<NullString> {}
    impl Sealed for Vec<NullInt64> {}
    impl Sealed for Vec<NullFloat64> {}
    impl Sealed for Vec<NullBool> {}
    impl Sealed for Vec<NullTimestamp> {}
    impl Sealed for Vec<NullDate> {}
    impl Sealed for Vec<NullRow> {}

    impl Sealed for crate::generic::GenericColumnValue {}
    impl Sealed for crate::encode::Value {}

    impl<T: Sealed> Sealed for Option<T> {}
    impl<R: crate::record::Record> Sealed for Vec<Option<R>> {}
}

pub(crate) use sealed::Sealed;
