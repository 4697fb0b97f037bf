//! Wire type descriptors and wire values.
//!
//! Mirrors the store's protocol messages: a `Type` is a tagged union
//! over scalar codes plus ARRAY (with an element type) and STRUCT (with
//! an ordered field list), and a `Value` is a small closed union of
//! payload kinds. Non-finite FLOAT64 values travel as strings for
//! JSON-safety, which is why FLOAT64 decoding accepts both `Number` and
//! `String` payloads.

use std::fmt;

/// Type code of a wire type descriptor.
///
/// Numeric values match the store's protocol enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(i32)]
pub enum TypeCode {
    /// Sentinel for values whose type the server did not specify.
    /// Decoding these is delegated to the session layer's sparse path.
    Unspecified = 0,
    String = 1,
    Int64 = 2,
    Float64 = 3,
    Bool = 4,
    Bytes = 5,
    Timestamp = 6,
    Date = 7,
    Array = 8,
    Struct = 9,
}

impl Default for TypeCode {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unspecified => "TYPE_CODE_UNSPECIFIED",
            Self::String => "STRING",
            Self::Int64 => "INT64",
            Self::Float64 => "FLOAT64",
            Self::Bool => "BOOL",
            Self::Bytes => "BYTES",
            Self::Timestamp => "TIMESTAMP",
            Self::Date => "DATE",
            Self::Array => "ARRAY",
            Self::Struct => "STRUCT",
        };
        f.write_str(name)
    }
}

/// A self-describing wire type descriptor.
///
/// Invariants (enforced by the constructors, checked by the codec when
/// descriptors arrive off the wire):
/// - `code == Array` implies `array_element_type` is present;
/// - `code == Struct` implies `struct_type` is present (possibly with
///   zero fields).
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct WireType {
    pub code: TypeCode,
    /// Element type when `code == Array`.
    pub array_element_type: Option<Box<WireType>>,
    /// Field list when `code == Struct`.
    pub struct_type: Option<StructType>,
}

impl WireType {
    const fn scalar(code: TypeCode) -> Self {
        Self {
            code,
            array_element_type: None,
            struct_type: None,
        }
    }

    /// The STRING type descriptor.
    pub const fn string() -> Self {
        Self::scalar(TypeCode::String)
    }

    /// The INT64 type descriptor.
    pub const fn int64() -> Self {
        Self::scalar(TypeCode::Int64)
    }

    /// The FLOAT64 type descriptor.
    pub const fn float64() -> Self {
        Self::scalar(TypeCode::Float64)
    }

    /// The BOOL type descriptor.
    pub const fn bool() -> Self {
        Self::scalar(TypeCode::Bool)
    }

    /// The BYTES type descriptor.
    pub const fn bytes() -> Self {
        Self::scalar(TypeCode::Bytes)
    }

    /// The TIMESTAMP type descriptor.
    pub const fn timestamp() -> Self {
        Self::scalar(TypeCode::Timestamp)
    }

    /// The DATE type descriptor.
    pub const fn date() -> Self {
        Self::scalar(TypeCode::Date)
    }

    /// An ARRAY type descriptor with the given element type.
    pub fn array(element: WireType) -> Self {
        Self {
            code: TypeCode::Array,
            array_element_type: Some(Box::new(element)),
            struct_type: None,
        }
    }

    /// A STRUCT type descriptor with the given ordered fields.
    pub fn strukt(fields: Vec<StructField>) -> Self {
        Self {
            code: TypeCode::Struct,
            array_element_type: None,
            struct_type: Some(StructType { fields }),
        }
    }

    /// Wire-protocol rendering of this descriptor's code, formatting
    /// arrays as `ARRAY[element]`. Used in error messages.
    pub fn code_display(&self) -> String {
        match (&self.code, &self.array_element_type) {
            (TypeCode::Array, Some(elem)) => format!("ARRAY[{}]", elem.code),
            (TypeCode::Array, None) => "ARRAY[?]".to_owned(),
            (code, _) => code.to_string(),
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code_display())
    }
}

/// The structural part of a STRUCT type descriptor: an ordered field
/// list. Field names need not be unique at the wire level; decoding
/// into a native record rejects duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct StructType {
    pub fields: Vec<StructField>,
}

/// One declared field of a STRUCT type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StructField {
    pub name: String,
    /// Optional at the wire level; a missing field type is a
    /// precondition failure at decode time.
    pub field_type: Option<WireType>,
}

impl StructField {
    /// A named field with a present type descriptor.
    pub fn new(name: impl Into<String>, field_type: WireType) -> Self {
        Self {
            name: name.into(),
            field_type: Some(field_type),
        }
    }
}

/// A wire value payload.
///
/// Interpretation requires the paired [`WireType`]: a `String` payload
/// may be a STRING, a DATE, a TIMESTAMP, or a non-finite FLOAT64
/// sentinel depending on the descriptor.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum WireValue {
    Null,
    String(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    List(Vec<WireValue>),
    /// Structured timestamp payload, Unix epoch seconds plus
    /// nanoseconds.
    Timestamp { seconds: i64, nanos: i32 },
}

impl Default for WireValue {
    fn default() -> Self {
        Self::Null
    }
}

impl WireValue {
    /// True if this payload is the wire NULL.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of this payload's kind, for error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::String(_) => "String",
            Self::Integer(_) => "Integer",
            Self::Number(_) => "Number",
            Self::Bool(_) => "Bool",
            Self::Bytes(_) => "Bytes",
            Self::List(_) => "List",
            Self::Timestamp { .. } => "Timestamp",
        }
    }

    /// The list payload, if this is a `List`.
    pub fn as_list(&self) -> Option<&[WireValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_constructors_carry_no_composites() {
        let ty = WireType::int64();
        assert_eq!(ty.code, TypeCode::Int64);
        assert!(ty.array_element_type.is_none());
        assert!(ty.struct_type.is_none());
    }

    #[test]
    fn array_constructor_holds_element_type() {
        let ty = WireType::array(WireType::string());
        assert_eq!(ty.code, TypeCode::Array);
        assert_eq!(
            ty.array_element_type.as_deref(),
            Some(&WireType::string())
        );
    }

    #[test]
    fn struct_constructor_allows_empty_field_list() {
        let ty = WireType::strukt(vec![]);
        assert_eq!(ty.code, TypeCode::Struct);
        assert!(ty.struct_type.as_ref().unwrap().fields.is_empty());
    }

    #[test]
    fn code_display_formats_arrays() {
        assert_eq!(WireType::string().code_display(), "STRING");
        assert_eq!(
            WireType::array(WireType::float64()).code_display(),
            "ARRAY[FLOAT64]"
        );
        assert_eq!(
            WireType::array(WireType::strukt(vec![])).code_display(),
            "ARRAY[STRUCT]"
        );
    }

    #[test]
    fn kind_names() {
        assert_eq!(WireValue::Null.kind_name(), "Null");
        assert_eq!(WireValue::Integer(1).kind_name(), "Integer");
        assert_eq!(WireValue::List(vec![]).kind_name(), "List");
        assert_eq!(
            WireValue::Timestamp {
                seconds: 0,
                nanos: 0
            }
            .kind_name(),
            "Timestamp"
        );
    }

    #[test]
    fn serde_round_trip_of_descriptor() {
        let ty = WireType::array(WireType::strukt(vec![
            StructField::new("id", WireType::int64()),
            StructField::new("name", WireType::string()),
        ]));
        let json = serde_json::to_string(&ty).unwrap();
        let back: WireType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }

    #[test]
    fn serde_round_trip_of_value() {
        let value = WireValue::List(vec![
            WireValue::Null,
            WireValue::String("x".to_owned()),
            WireValue::Number(1.5),
            WireValue::Bytes(vec![0xCA, 0xFE]),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        let back: WireValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
