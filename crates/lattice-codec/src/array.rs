//! ARRAY decode: a wire list plus an element descriptor into native
//! vectors.
//!
//! Two surfaces live here. The free functions mirror the transport
//! layer's per-kind helpers and always produce nullable elements. The
//! [`FromWire`] impls for `Vec<_>` plug arrays into [`decode_value`]
//! and let the element shape decide what a NULL element means: plain
//! elements reject it, wrapper elements absorb it.
//!
//! [`decode_value`]: crate::decode::decode_value

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use lattice_error::{LatticeError, Result};
use lattice_types::{
    NullBool, NullDate, NullFloat64, NullInt64, NullRow, NullString, NullTimestamp, Row,
    StructType, TypeCode, WireType, WireValue,
};

use crate::decode::{
    bool_value, bytes_value, check_array, date_value, float_value, integer_value, list_value,
    string_value, timestamp_value, unexpected_kind, FromWire,
};

fn decode_nullable_array<T, F>(
    list: Option<&[WireValue]>,
    element_type: &'static str,
    get: F,
) -> Result<Vec<T>>
where
    T: Default,
    F: Fn(&WireValue) -> Result<T>,
{
    let list = list.ok_or(LatticeError::MissingListValue { element_type })?;
    let mut out = Vec::with_capacity(list.len());
    for (index, value) in list.iter().enumerate() {
        if value.is_null() {
            out.push(T::default());
            continue;
        }
        let item = get(value).map_err(|e| LatticeError::array_element(index, element_type, e))?;
        out.push(item);
    }
    Ok(out)
}

/// Decodes an ARRAY[STRING] payload; NULL elements become invalid
/// wrappers.
pub fn decode_string_array(list: Option<&[WireValue]>) -> Result<Vec<NullString>> {
    decode_nullable_array(list, "STRING", |v| {
        Ok(NullString::from(string_value(v)?.to_owned()))
    })
}

/// Decodes an ARRAY[INT64] payload; NULL elements become invalid
/// wrappers.
pub fn decode_int64_array(list: Option<&[WireValue]>) -> Result<Vec<NullInt64>> {
    decode_nullable_array(list, "INT64", |v| Ok(NullInt64::from(integer_value(v)?)))
}

/// Decodes an ARRAY[FLOAT64] payload; NULL elements become invalid
/// wrappers.
pub fn decode_float64_array(list: Option<&[WireValue]>) -> Result<Vec<NullFloat64>> {
    decode_nullable_array(list, "FLOAT64", |v| Ok(NullFloat64::from(float_value(v)?)))
}

/// Decodes an ARRAY[BOOL] payload; NULL elements become invalid
/// wrappers.
pub fn decode_bool_array(list: Option<&[WireValue]>) -> Result<Vec<NullBool>> {
    decode_nullable_array(list, "BOOL", |v| Ok(NullBool::from(bool_value(v)?)))
}

/// Decodes an ARRAY[BYTES] payload; NULL elements become `None`.
pub fn decode_bytes_array(list: Option<&[WireValue]>) -> Result<Vec<Option<Vec<u8>>>> {
    decode_nullable_array(list, "BYTES", |v| Ok(Some(bytes_value(v)?)))
}

/// Decodes an ARRAY[TIMESTAMP] payload; NULL elements become invalid
/// wrappers.
pub fn decode_timestamp_array(list: Option<&[WireValue]>) -> Result<Vec<NullTimestamp>> {
    decode_nullable_array(list, "TIMESTAMP", |v| {
        Ok(NullTimestamp::from(timestamp_value(v)?))
    })
}

/// Decodes an ARRAY[DATE] payload; NULL elements become invalid
/// wrappers.
pub fn decode_date_array(list: Option<&[WireValue]>) -> Result<Vec<NullDate>> {
    decode_nullable_array(list, "DATE", |v| Ok(NullDate::from(date_value(v)?)))
}

/// Decodes an ARRAY[STRUCT] payload into rows. All rows share one
/// descriptor allocation; NULL elements become invalid wrappers.
pub fn decode_row_array(
    struct_type: Option<&StructType>,
    list: Option<&[WireValue]>,
) -> Result<Vec<NullRow>> {
    let struct_type = struct_type.ok_or(LatticeError::MissingStructType)?;
    let shared = Arc::new(struct_type.clone());
    decode_nullable_array(list, "STRUCT", |v| match v {
        WireValue::List(values) => Ok(NullRow {
            row: Row::new(Arc::clone(&shared), values.clone()),
            valid: true,
        }),
        other => Err(unexpected_kind(other, "List")),
    })
}

// --- FromWire plumbing ------------------------------------------------------

pub(crate) fn decode_elements<T: FromWire + Default>(
    list: &[WireValue],
    elem_ty: &WireType,
    element_type: &'static str,
) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(list.len());
    for (index, value) in list.iter().enumerate() {
        let mut slot = T::default();
        let decoded = if value.is_null() {
            slot.decode_null(elem_ty)
        } else {
            slot.decode_non_null(value, elem_ty)
        };
        decoded.map_err(|e| LatticeError::array_element(index, element_type, e))?;
        out.push(slot);
    }
    Ok(out)
}

macro_rules! array_from_wire {
    ($elem:ty, $name:literal, $code:expr, $etype:literal) => {
        impl FromWire for Vec<$elem> {
            fn dest_name() -> &'static str {
                $name
            }

            fn check_type(ty: &WireType) -> Result<()> {
                check_array(ty, $code, Self::dest_name())
            }

            fn decode_non_null(&mut self, value: &WireValue, ty: &WireType) -> Result<()> {
                let elem_ty = ty
                    .array_element_type
                    .as_deref()
                    .ok_or(LatticeError::MissingArrayElementType)?;
                *self = decode_elements(list_value(value)?, elem_ty, $etype)?;
                Ok(())
            }
        }
    };
}

array_from_wire!(String, "Vec<String>", TypeCode::String, "STRING");
array_from_wire!(i64, "Vec<i64>", TypeCode::Int64, "INT64");
array_from_wire!(f64, "Vec<f64>", TypeCode::Float64, "FLOAT64");
array_from_wire!(bool, "Vec<bool>", TypeCode::Bool, "BOOL");
// NULL elements are rejected on this path; `decode_bytes_array` is the
// nullable-element surface for BYTES arrays.
array_from_wire!(Vec<u8>, "Vec<Vec<u8>>", TypeCode::Bytes, "BYTES");
array_from_wire!(
    DateTime<Utc>,
    "Vec<DateTime<Utc>>",
    TypeCode::Timestamp,
    "TIMESTAMP"
);
array_from_wire!(NaiveDate, "Vec<NaiveDate>", TypeCode::Date, "DATE");

array_from_wire!(NullString, "Vec<NullString>", TypeCode::String, "STRING");
array_from_wire!(NullInt64, "Vec<NullInt64>", TypeCode::Int64, "INT64");
array_from_wire!(NullFloat64, "Vec<NullFloat64>", TypeCode::Float64, "FLOAT64");
array_from_wire!(NullBool, "Vec<NullBool>", TypeCode::Bool, "BOOL");
array_from_wire!(
    NullTimestamp,
    "Vec<NullTimestamp>",
    TypeCode::Timestamp,
    "TIMESTAMP"
);
array_from_wire!(NullDate, "Vec<NullDate>", TypeCode::Date, "DATE");

impl FromWire for Vec<NullRow> {
    fn dest_name() -> &'static str {
        "Vec<NullRow>"
    }

    fn check_type(ty: &WireType) -> Result<()> {
        check_array(ty, TypeCode::Struct, Self::dest_name())
    }

    fn decode_non_null(&mut self, value: &WireValue, ty: &WireType) -> Result<()> {
        let elem_ty = ty
            .array_element_type
            .as_deref()
            .ok_or(LatticeError::MissingArrayElementType)?;
        *self = decode_row_array(elem_ty.struct_type.as_ref(), Some(list_value(value)?))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_value;
    use lattice_types::StructField;

    fn list(values: Vec<WireValue>) -> WireValue {
        WireValue::List(values)
    }

    #[test]
    fn nullable_string_array() {
        let got = decode_string_array(Some(&[
            WireValue::String("a".to_owned()),
            WireValue::Null,
            WireValue::String("b".to_owned()),
        ]))
        .unwrap();
        assert_eq!(
            got,
            vec![
                NullString::from("a".to_owned()),
                NullString::default(),
                NullString::from("b".to_owned()),
            ]
        );
    }

    #[test]
    fn missing_list_is_a_precondition_failure() {
        let err = decode_int64_array(None).unwrap_err();
        assert!(matches!(
            err,
            LatticeError::MissingListValue {
                element_type: "INT64"
            }
        ));
    }

    #[test]
    fn element_errors_carry_the_index() {
        let err = decode_int64_array(Some(&[
            WireValue::Integer(1),
            WireValue::String("two".to_owned()),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "cannot decode array element 1 as INT64");
        let source = match err {
            LatticeError::ArrayElement { source, .. } => source,
            other => panic!("unexpected error: {other}"),
        };
        assert!(matches!(*source, LatticeError::UnexpectedValueKind { .. }));
    }

    #[test]
    fn bytes_vec_destination_rejects_null_elements() {
        let mut dest: Vec<Vec<u8>> = Vec::new();
        let err = decode_value(
            &list(vec![WireValue::Bytes(vec![1]), WireValue::Null]),
            &WireType::array(WireType::bytes()),
            &mut dest,
        )
        .unwrap_err();
        let source = match err {
            LatticeError::ArrayElement { index: 1, element_type: "BYTES", source } => source,
            other => panic!("unexpected error: {other}"),
        };
        assert!(matches!(*source, LatticeError::NullValue { dest: "Vec<u8>" }));
    }

    #[test]
    fn bytes_array_nulls_are_none() {
        let got =
            decode_bytes_array(Some(&[WireValue::Bytes(vec![1, 2]), WireValue::Null])).unwrap();
        assert_eq!(got, vec![Some(vec![1, 2]), None]);
    }

    #[test]
    fn float_array_accepts_sentinels() {
        let got = decode_float64_array(Some(&[
            WireValue::Number(1.5),
            WireValue::String("NaN".to_owned()),
            WireValue::Null,
        ]))
        .unwrap();
        assert_eq!(got[0], NullFloat64::from(1.5));
        assert!(got[1].valid && got[1].value.is_nan());
        assert!(!got[2].valid);
    }

    #[test]
    fn plain_vec_rejects_null_elements() {
        let mut dest: Vec<i64> = Vec::new();
        let err = decode_value(
            &list(vec![WireValue::Integer(1), WireValue::Null]),
            &WireType::array(WireType::int64()),
            &mut dest,
        )
        .unwrap_err();
        let source = match err {
            LatticeError::ArrayElement { index: 1, source, .. } => source,
            other => panic!("unexpected error: {other}"),
        };
        assert!(matches!(*source, LatticeError::NullValue { dest: "i64" }));
    }

    #[test]
    fn nullable_vec_absorbs_null_elements() {
        let mut dest: Vec<NullBool> = Vec::new();
        decode_value(
            &list(vec![WireValue::Bool(true), WireValue::Null]),
            &WireType::array(WireType::bool()),
            &mut dest,
        )
        .unwrap();
        assert_eq!(dest, vec![NullBool::from(true), NullBool::default()]);
    }

    #[test]
    fn empty_array_versus_null_array() {
        let ty = WireType::array(WireType::string());

        let mut dest: Option<Vec<String>> = None;
        decode_value(&list(vec![]), &ty, &mut dest).unwrap();
        assert_eq!(dest, Some(vec![]));

        decode_value(&WireValue::Null, &ty, &mut dest).unwrap();
        assert_eq!(dest, None);
    }

    #[test]
    fn element_code_is_part_of_the_type_check() {
        let mut dest: Vec<i64> = Vec::new();
        let err = decode_value(
            &list(vec![]),
            &WireType::array(WireType::string()),
            &mut dest,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LatticeError::TypeMismatch { dest: "Vec<i64>", ref wire } if wire == "ARRAY[STRING]"
        ));
    }

    #[test]
    fn row_array_shares_one_descriptor() {
        let st = StructType {
            fields: vec![StructField::new("n", WireType::int64())],
        };
        let got = decode_row_array(
            Some(&st),
            Some(&[
                list(vec![WireValue::Integer(1)]),
                WireValue::Null,
                list(vec![WireValue::Integer(2)]),
            ]),
        )
        .unwrap();
        assert!(got[0].valid);
        assert!(!got[1].valid);
        assert!(got[2].valid);
        assert!(Arc::ptr_eq(
            got[0].row.struct_type(),
            got[2].row.struct_type()
        ));
        assert_eq!(got[2].row.values(), &[WireValue::Integer(2)]);
    }

    #[test]
    fn row_array_requires_a_struct_descriptor() {
        let err = decode_row_array(None, Some(&[])).unwrap_err();
        assert!(matches!(err, LatticeError::MissingStructType));
    }

    use proptest::prelude::*;

    fn arb_nullable_ints() -> impl Strategy<Value = Vec<Option<i64>>> {
        proptest::collection::vec(proptest::option::of(any::<i64>()), 0..64)
    }

    proptest! {
        #[test]
        fn prop_int64_array_preserves_length_and_null_placement(
            original in arb_nullable_ints()
        ) {
            let wire: Vec<WireValue> = original
                .iter()
                .map(|o| o.map_or(WireValue::Null, WireValue::Integer))
                .collect();
            let got = decode_int64_array(Some(&wire)).unwrap();
            prop_assert_eq!(got.len(), original.len());
            for (decoded, expected) in got.iter().zip(&original) {
                prop_assert_eq!(decoded.valid, expected.is_some());
                if let Some(n) = expected {
                    prop_assert_eq!(decoded.value, *n);
                }
            }
        }

        #[test]
        fn prop_plain_vec_and_nullable_vec_agree_on_null_free_input(
            original in proptest::collection::vec(any::<i64>(), 0..64)
        ) {
            let wire = WireValue::List(
                original.iter().copied().map(WireValue::Integer).collect(),
            );
            let ty = WireType::array(WireType::int64());

            let mut plain: Vec<i64> = Vec::new();
            decode_value(&wire, &ty, &mut plain).unwrap();
            prop_assert_eq!(&plain, &original);

            let mut nullable: Vec<NullInt64> = Vec::new();
            decode_value(&wire, &ty, &mut nullable).unwrap();
            let unwrapped: Vec<i64> = nullable.iter().map(|n| n.value).collect();
            prop_assert_eq!(unwrapped, original);
        }
    }

    #[test]
    fn row_array_through_from_wire() {
        let elem = WireType::strukt(vec![StructField::new("s", WireType::string())]);
        let ty = WireType::array(elem);
        let mut dest: Vec<NullRow> = Vec::new();
        decode_value(
            &list(vec![list(vec![WireValue::String("x".to_owned())])]),
            &ty,
            &mut dest,
        )
        .unwrap();
        assert_eq!(dest.len(), 1);
        assert!(dest[0].valid);
    }
}
