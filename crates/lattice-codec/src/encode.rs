//! Encode: native values into wire values plus type descriptors.
//!
//! Encoding is total over a closed set of shapes, so the sealed
//! [`ToWire`] trait has no open-world dispatch. Heterogeneous
//! parameter lists go through the [`Value`] union, which closes over
//! every encodable shape once.
//!
//! TIMESTAMP encodes as an RFC-3339 string with nanosecond precision
//! and DATE as `YYYY-MM-DD`. Non-finite FLOAT64 values are encoded
//! numerically; only the decode side accepts the string sentinels,
//! which the server emits for JSON transports.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use lattice_error::Result;
use lattice_types::{
    NullBool, NullDate, NullFloat64, NullInt64, NullString, NullTimestamp, WireType, WireValue,
};

use crate::generic::GenericColumnValue;
use crate::Sealed;

/// A native shape the encoder can turn into a wire value.
pub trait ToWire: Sealed {
    /// The wire value and, when the shape determines one, its type
    /// descriptor. Every NULL encodes with an absent descriptor; the
    /// receiver supplies the type.
    fn to_wire(&self) -> Result<(WireValue, Option<WireType>)>;

    /// The fixed descriptor for this shape, when one is statically
    /// determined. Labels non-null encodings and array element types;
    /// dynamic shapes return `None`.
    fn wire_type() -> Option<WireType>
    where
        Self: Sized,
    {
        None
    }
}

/// Encode one native value.
pub fn encode_value<T: ToWire>(native: &T) -> Result<(WireValue, Option<WireType>)> {
    native.to_wire()
}

/// Encode a parameter list, keeping only the wire values. Descriptors
/// for list positions travel separately in the request metadata.
pub fn encode_value_array(values: &[Value]) -> Result<Vec<WireValue>> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        out.push(value.to_wire()?.0);
    }
    Ok(out)
}

fn timestamp_wire(t: &DateTime<Utc>) -> WireValue {
    WireValue::String(t.to_rfc3339_opts(SecondsFormat::Nanos, true))
}

fn date_wire(d: &NaiveDate) -> WireValue {
    WireValue::String(d.format("%Y-%m-%d").to_string())
}

macro_rules! scalar_to_wire {
    ($ty:ty, $wire_ty:expr, $conv:expr) => {
        impl ToWire for $ty {
            fn to_wire(&self) -> Result<(WireValue, Option<WireType>)> {
                let conv: fn(&$ty) -> WireValue = $conv;
                Ok((conv(self), Self::wire_type()))
            }

            fn wire_type() -> Option<WireType> {
                Some($wire_ty)
            }
        }
    };
}

scalar_to_wire!(String, WireType::string(), |s| WireValue::String(s.clone()));
scalar_to_wire!(i64, WireType::int64(), |n| WireValue::Integer(*n));
scalar_to_wire!(f64, WireType::float64(), |x| WireValue::Number(*x));
scalar_to_wire!(bool, WireType::bool(), |b| WireValue::Bool(*b));
scalar_to_wire!(Vec<u8>, WireType::bytes(), |b: &Vec<u8>| WireValue::Bytes(
    b.clone()
));
scalar_to_wire!(DateTime<Utc>, WireType::timestamp(), timestamp_wire);
scalar_to_wire!(NaiveDate, WireType::date(), date_wire);

// An invalid wrapper is the nil case: NULL with the descriptor absent,
// exactly like `Option::None`. The wrapper's kind survives only as the
// element label when it sits inside an array.
macro_rules! nullable_to_wire {
    ($ty:ty, $inner:ty) => {
        impl ToWire for $ty {
            fn to_wire(&self) -> Result<(WireValue, Option<WireType>)> {
                if self.valid {
                    self.value.to_wire()
                } else {
                    Ok((WireValue::Null, None))
                }
            }

            fn wire_type() -> Option<WireType> {
                <$inner>::wire_type()
            }
        }
    };
}

nullable_to_wire!(NullString, String);
nullable_to_wire!(NullInt64, i64);
nullable_to_wire!(NullFloat64, f64);
nullable_to_wire!(NullBool, bool);
nullable_to_wire!(NullTimestamp, DateTime<Utc>);
nullable_to_wire!(NullDate, NaiveDate);

impl<T: ToWire> ToWire for Option<T> {
    fn to_wire(&self) -> Result<(WireValue, Option<WireType>)> {
        match self {
            Some(inner) => inner.to_wire(),
            None => Ok((WireValue::Null, None)),
        }
    }

    fn wire_type() -> Option<WireType> {
        T::wire_type()
    }
}

macro_rules! array_to_wire {
    ($elem:ty) => {
        impl ToWire for Vec<$elem> {
            fn to_wire(&self) -> Result<(WireValue, Option<WireType>)> {
                let mut values = Vec::with_capacity(self.len());
                for item in self {
                    values.push(item.to_wire()?.0);
                }
                Ok((WireValue::List(values), Self::wire_type()))
            }

            fn wire_type() -> Option<WireType> {
                <$elem>::wire_type().map(WireType::array)
            }
        }
    };
}

array_to_wire!(String);
array_to_wire!(i64);
array_to_wire!(f64);
array_to_wire!(bool);
array_to_wire!(Vec<u8>);
array_to_wire!(DateTime<Utc>);
array_to_wire!(NaiveDate);
array_to_wire!(NullString);
array_to_wire!(NullInt64);
array_to_wire!(NullFloat64);
array_to_wire!(NullBool);
array_to_wire!(NullTimestamp);
array_to_wire!(NullDate);

/// The closed union of encodable shapes, for heterogeneous parameter
/// lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An untyped NULL; the receiver supplies the type.
    Null,
    String(String),
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    NullString(NullString),
    NullInt64(NullInt64),
    NullFloat64(NullFloat64),
    NullBool(NullBool),
    NullTimestamp(NullTimestamp),
    NullDate(NullDate),
    StringArray(Vec<NullString>),
    Int64Array(Vec<NullInt64>),
    Float64Array(Vec<NullFloat64>),
    BoolArray(Vec<NullBool>),
    BytesArray(Vec<Vec<u8>>),
    TimestampArray(Vec<NullTimestamp>),
    DateArray(Vec<NullDate>),
    Generic(GenericColumnValue),
}

impl ToWire for Value {
    fn to_wire(&self) -> Result<(WireValue, Option<WireType>)> {
        match self {
            Self::Null => Ok((WireValue::Null, None)),
            Self::String(v) => v.to_wire(),
            Self::Int64(v) => v.to_wire(),
            Self::Float64(v) => v.to_wire(),
            Self::Bool(v) => v.to_wire(),
            Self::Bytes(v) => v.to_wire(),
            Self::Timestamp(v) => v.to_wire(),
            Self::Date(v) => v.to_wire(),
            Self::NullString(v) => v.to_wire(),
            Self::NullInt64(v) => v.to_wire(),
            Self::NullFloat64(v) => v.to_wire(),
            Self::NullBool(v) => v.to_wire(),
            Self::NullTimestamp(v) => v.to_wire(),
            Self::NullDate(v) => v.to_wire(),
            Self::StringArray(v) => v.to_wire(),
            Self::Int64Array(v) => v.to_wire(),
            Self::Float64Array(v) => v.to_wire(),
            Self::BoolArray(v) => v.to_wire(),
            Self::BytesArray(v) => v.to_wire(),
            Self::TimestampArray(v) => v.to_wire(),
            Self::DateArray(v) => v.to_wire(),
            Self::Generic(v) => v.to_wire(),
        }
    }
}

macro_rules! value_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

value_from!(String, String);
value_from!(Int64, i64);
value_from!(Float64, f64);
value_from!(Bool, bool);
value_from!(Bytes, Vec<u8>);
value_from!(Timestamp, DateTime<Utc>);
value_from!(Date, NaiveDate);
value_from!(NullString, NullString);
value_from!(NullInt64, NullInt64);
value_from!(NullFloat64, NullFloat64);
value_from!(NullBool, NullBool);
value_from!(NullTimestamp, NullTimestamp);
value_from!(NullDate, NullDate);
value_from!(StringArray, Vec<NullString>);
value_from!(Int64Array, Vec<NullInt64>);
value_from!(Float64Array, Vec<NullFloat64>);
value_from!(BoolArray, Vec<NullBool>);
value_from!(BytesArray, Vec<Vec<u8>>);
value_from!(TimestampArray, Vec<NullTimestamp>);
value_from!(DateArray, Vec<NullDate>);
value_from!(Generic, GenericColumnValue);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}
