//! Scalar decode: one wire value + type descriptor into one native
//! destination.
//!
//! Dispatch is double: the wire type code on one axis, the destination
//! shape on the other. The destination axis is the sealed [`FromWire`]
//! trait — one impl per supported shape. Every impl checks the type
//! code first and handles NULL second, so a NULL under the wrong
//! descriptor reports the type mismatch, not the NULL.

use chrono::{DateTime, NaiveDate, Utc};
use lattice_error::{LatticeError, Result};
use lattice_types::{
    NullBool, NullDate, NullFloat64, NullInt64, NullString, NullTimestamp, TypeCode, WireType,
    WireValue,
};

use crate::Sealed;

/// A native destination shape the scalar codec can decode into.
///
/// The three-method split exists so the blanket [`Option`] impl can run
/// the type check before deciding how to represent NULL. Callers use
/// [`decode_value`]; the methods are not meant to be invoked directly.
pub trait FromWire: Sealed + Sized {
    /// Destination name used in error messages.
    fn dest_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Checks that `ty` is compatible with this destination shape.
    fn check_type(ty: &WireType) -> Result<()>;

    /// Handles a wire NULL. Plain scalars have no way to represent
    /// absence and reject it; nullable shapes reset to their zero
    /// form.
    fn decode_null(&mut self, ty: &WireType) -> Result<()> {
        let _ = ty;
        Err(LatticeError::null_value(Self::dest_name()))
    }

    /// Decodes a non-NULL wire value. `check_type` has already passed.
    fn decode_non_null(&mut self, value: &WireValue, ty: &WireType) -> Result<()>;
}

/// Decode a wire value into a native destination, as directed by the
/// wire type descriptor.
///
/// The unspecified type code belongs to the session layer's sparse
/// path and is rejected here; an ARRAY descriptor without an element
/// type is a precondition failure regardless of destination shape.
pub fn decode_value<T: FromWire>(value: &WireValue, ty: &WireType, dest: &mut T) -> Result<()> {
    if ty.code == TypeCode::Unspecified {
        return Err(LatticeError::SparseDecodeUnsupported);
    }
    if ty.code == TypeCode::Array && ty.array_element_type.is_none() {
        return Err(LatticeError::MissingArrayElementType);
    }
    T::check_type(ty)?;
    if value.is_null() {
        dest.decode_null(ty)
    } else {
        dest.decode_non_null(value, ty)
    }
}

/// [`decode_value`] for callers holding proto-optional inputs.
///
/// The transport layer reads descriptors and values off the network
/// where both are optional fields; a missing value and a missing type
/// are distinct precondition failures.
pub fn decode_optional_value<T: FromWire>(
    value: Option<&WireValue>,
    ty: Option<&WireType>,
    dest: &mut T,
) -> Result<()> {
    let value = value.ok_or(LatticeError::MissingValue)?;
    let ty = ty.ok_or(LatticeError::MissingType)?;
    decode_value(value, ty, dest)
}

// --- wire payload accessors -------------------------------------------------

pub(crate) fn unexpected_kind(value: &WireValue, want: &'static str) -> LatticeError {
    LatticeError::UnexpectedValueKind {
        got: value.kind_name(),
        want,
    }
}

pub(crate) fn string_value(value: &WireValue) -> Result<&str> {
    match value {
        WireValue::String(s) => Ok(s),
        _ => Err(unexpected_kind(value, "String")),
    }
}

pub(crate) fn integer_value(value: &WireValue) -> Result<i64> {
    match value {
        WireValue::Integer(x) => Ok(*x),
        _ => Err(unexpected_kind(value, "Integer")),
    }
}

pub(crate) fn bool_value(value: &WireValue) -> Result<bool> {
    match value {
        WireValue::Bool(x) => Ok(*x),
        _ => Err(unexpected_kind(value, "Bool")),
    }
}

pub(crate) fn bytes_value(value: &WireValue) -> Result<Vec<u8>> {
    match value {
        WireValue::Bytes(b) => Ok(b.clone()),
        _ => Err(unexpected_kind(value, "Bytes")),
    }
}

pub(crate) fn list_value(value: &WireValue) -> Result<&[WireValue]> {
    value
        .as_list()
        .ok_or_else(|| unexpected_kind(value, "List"))
}

/// FLOAT64 payloads are numeric, except that the wire encodes
/// non-finite values as strings for JSON-safety.
pub(crate) fn float_value(value: &WireValue) -> Result<f64> {
    match value {
        WireValue::Number(x) => Ok(*x),
        WireValue::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            _ => Err(LatticeError::UnexpectedNumberString { value: s.clone() }),
        },
        _ => Err(unexpected_kind(value, "Number")),
    }
}

#[derive(Debug)]
struct TimestampOutOfRange;

impl std::fmt::Display for TimestampOutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("timestamp out of range")
    }
}

impl std::error::Error for TimestampOutOfRange {}

/// TIMESTAMP payloads arrive either as RFC-3339 strings (result rows)
/// or as the structured epoch form (sparse reads); both are accepted.
pub(crate) fn timestamp_value(value: &WireValue) -> Result<DateTime<Utc>> {
    match value {
        WireValue::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| LatticeError::bad_encoding(s.clone(), e)),
        WireValue::Timestamp { seconds, nanos } => u32::try_from(*nanos)
            .ok()
            .and_then(|nanos| DateTime::<Utc>::from_timestamp(*seconds, nanos))
            .ok_or_else(|| {
                LatticeError::bad_encoding(
                    format!("{seconds}s+{nanos}ns"),
                    TimestampOutOfRange,
                )
            }),
        _ => Err(unexpected_kind(value, "Timestamp")),
    }
}

pub(crate) fn date_value(value: &WireValue) -> Result<NaiveDate> {
    let s = string_value(value)?;
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| LatticeError::bad_encoding(s.to_owned(), e))
}

// --- type checks ------------------------------------------------------------

pub(crate) fn check_scalar(ty: &WireType, want: TypeCode, dest: &'static str) -> Result<()> {
    if ty.code == want {
        Ok(())
    } else {
        Err(LatticeError::type_mismatch(dest, ty.code_display()))
    }
}

pub(crate) fn check_array(ty: &WireType, want_element: TypeCode, dest: &'static str) -> Result<()> {
    match (ty.code, ty.array_element_type.as_deref()) {
        (TypeCode::Array, Some(element)) if element.code == want_element => Ok(()),
        _ => Err(LatticeError::type_mismatch(dest, ty.code_display())),
    }
}

// --- plain scalar destinations ----------------------------------------------

macro_rules! plain_from_wire {
    ($dest:ty, $name:literal, $code:expr, $get:expr) => {
        impl FromWire for $dest {
            fn dest_name() -> &'static str {
                $name
            }

            fn check_type(ty: &WireType) -> Result<()> {
                check_scalar(ty, $code, Self::dest_name())
            }

            fn decode_non_null(&mut self, value: &WireValue, _ty: &WireType) -> Result<()> {
                *self = $get(value)?;
                Ok(())
            }
        }
    };
}

plain_from_wire!(String, "String", TypeCode::String, |v| string_value(v)
    .map(str::to_owned));
plain_from_wire!(i64, "i64", TypeCode::Int64, integer_value);
plain_from_wire!(f64, "f64", TypeCode::Float64, float_value);
plain_from_wire!(bool, "bool", TypeCode::Bool, bool_value);
plain_from_wire!(Vec<u8>, "Vec<u8>", TypeCode::Bytes, bytes_value);
plain_from_wire!(
    DateTime<Utc>,
    "DateTime<Utc>",
    TypeCode::Timestamp,
    timestamp_value
);
plain_from_wire!(NaiveDate, "NaiveDate", TypeCode::Date, date_value);

// --- nullable scalar destinations -------------------------------------------

macro_rules! nullable_from_wire {
    ($dest:ty, $name:literal, $code:expr, $get:expr) => {
        impl FromWire for $dest {
            fn dest_name() -> &'static str {
                $name
            }

            fn check_type(ty: &WireType) -> Result<()> {
                check_scalar(ty, $code, Self::dest_name())
            }

            fn decode_null(&mut self, _ty: &WireType) -> Result<()> {
                *self = Self::default();
                Ok(())
            }

            fn decode_non_null(&mut self, value: &WireValue, _ty: &WireType) -> Result<()> {
                self.value = $get(value)?;
                self.valid = true;
                Ok(())
            }
        }
    };
}

nullable_from_wire!(NullString, "NullString", TypeCode::String, |v| {
    string_value(v).map(str::to_owned)
});
nullable_from_wire!(NullInt64, "NullInt64", TypeCode::Int64, integer_value);
nullable_from_wire!(NullFloat64, "NullFloat64", TypeCode::Float64, float_value);
nullable_from_wire!(NullBool, "NullBool", TypeCode::Bool, bool_value);
nullable_from_wire!(
    NullTimestamp,
    "NullTimestamp",
    TypeCode::Timestamp,
    timestamp_value
);
nullable_from_wire!(NullDate, "NullDate", TypeCode::Date, date_value);

// --- nullable-at-the-outer-level destinations -------------------------------

/// NULL into `Option<T>` is `None`; anything else decodes into a fresh
/// `T`. This is the nil-slice / nil-pointer analog for every shape,
/// including whole arrays (a NULL array is `None`, an empty array is
/// `Some(vec![])`).
impl<T: FromWire + Default> FromWire for Option<T> {
    fn dest_name() -> &'static str {
        T::dest_name()
    }

    fn check_type(ty: &WireType) -> Result<()> {
        T::check_type(ty)
    }

    fn decode_null(&mut self, _ty: &WireType) -> Result<()> {
        *self = None;
        Ok(())
    }

    fn decode_non_null(&mut self, value: &WireValue, ty: &WireType) -> Result<()> {
        let mut slot = T::default();
        slot.decode_non_null(value, ty)?;
        *self = Some(slot);
        Ok(())
    }
}
