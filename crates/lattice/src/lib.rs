//! Public API facade for the Lattice value codec.
//!
//! Re-exports the wire data model, the codec entry points, and the
//! `Record` derive so applications depend on one crate.

pub use lattice_codec::{
    decode_bool_array, decode_bytes_array, decode_date_array, decode_float64_array,
    decode_int64_array, decode_optional_value, decode_row, decode_row_array, decode_string_array,
    decode_struct, decode_struct_array, decode_struct_in, decode_timestamp_array, decode_value,
    encode_value, encode_value_array, FieldCache, FieldSpec, FromWire, GenericColumnValue,
    Record, ResolvedFields, TagMode, ToWire, Value,
};
pub use lattice_derive::Record;
pub use lattice_error::{LatticeError, Result, StatusCode};
pub use lattice_types::{
    NullBool, NullDate, NullFloat64, NullInt64, NullRow, NullString, NullTimestamp, Row,
    StructField, StructType, TypeCode, WireType, WireValue,
};
