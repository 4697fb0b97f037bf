//! STRUCT decode: a wire row plus its struct descriptor into a native
//! record, a [`Row`], or a vector of either.
//!
//! Wire fields drive the walk, not record members. Every declared wire
//! field must land on exactly one member; members the descriptor never
//! mentions keep their default. A member two wire fields resolve to is
//! simply decoded twice into, which cannot happen once the descriptor
//! itself passes the duplicate-name check.

use std::collections::HashSet;
use std::sync::Arc;

use lattice_error::{LatticeError, Result};
use lattice_types::{Row, StructType, TypeCode, WireType, WireValue};

use crate::decode::{check_array, list_value, FromWire};
use crate::fields::FieldCache;
use crate::record::Record;

/// Decodes one wire row into an existing record.
///
/// Field resolution goes through the process-wide [`FieldCache`].
pub fn decode_struct_in<R: Record>(
    struct_type: &StructType,
    values: &[WireValue],
    dest: &mut R,
) -> Result<()> {
    let fields = FieldCache::global().resolved::<R>()?;
    let mut seen: HashSet<&str> = HashSet::with_capacity(struct_type.fields.len());
    for (position, field) in struct_type.fields.iter().enumerate() {
        if field.name.is_empty() {
            return Err(LatticeError::UnnamedField { index: position });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(LatticeError::DuplicateWireField {
                name: field.name.clone(),
            });
        }
        let index = fields
            .index_of(&field.name)
            .ok_or_else(|| LatticeError::NoOrDupRecordField {
                record: R::record_name(),
                field: field.name.clone(),
            })?;
        let value = values.get(position).ok_or(LatticeError::MissingValue)?;
        let ty = field.field_type.as_ref().ok_or(LatticeError::MissingType)?;
        dest.decode_field(index, value, ty)
            .map_err(|e| LatticeError::struct_field(field.name.clone(), e))?;
    }
    Ok(())
}

/// Decodes one STRUCT wire value into a fresh record.
///
/// A NULL struct has no record representation and is rejected; use
/// [`decode_struct_array`] or `Option` seams when absence is expected.
pub fn decode_struct<R: Record>(
    struct_type: Option<&StructType>,
    value: &WireValue,
) -> Result<R> {
    let struct_type = struct_type.ok_or(LatticeError::MissingStructType)?;
    match value {
        WireValue::Null => Err(LatticeError::null_value(R::record_name())),
        WireValue::List(values) => {
            let mut dest = R::default();
            decode_struct_in(struct_type, values, &mut dest)?;
            Ok(dest)
        }
        other => Err(LatticeError::NotAStruct {
            kind: other.kind_name(),
        }),
    }
}

/// Decodes an ARRAY[STRUCT] payload into records; NULL elements become
/// `None`.
pub fn decode_struct_array<R: Record>(
    struct_type: Option<&StructType>,
    list: Option<&[WireValue]>,
) -> Result<Vec<Option<R>>> {
    let struct_type = struct_type.ok_or(LatticeError::MissingStructType)?;
    let list = list.ok_or(LatticeError::MissingListValue {
        element_type: "STRUCT",
    })?;
    let mut out = Vec::with_capacity(list.len());
    for (index, value) in list.iter().enumerate() {
        if value.is_null() {
            out.push(None);
            continue;
        }
        let record = decode_struct(Some(struct_type), value)
            .map_err(|e| LatticeError::array_element(index, "STRUCT", e))?;
        out.push(Some(record));
    }
    Ok(out)
}

/// Decodes one STRUCT wire value into an untyped [`Row`], keeping the
/// descriptor alongside the values.
pub fn decode_row(struct_type: Option<&StructType>, value: &WireValue) -> Result<Row> {
    let struct_type = struct_type.ok_or(LatticeError::MissingStructType)?;
    match value {
        WireValue::Null => Err(LatticeError::null_value("Row")),
        WireValue::List(values) => Ok(Row::new(Arc::new(struct_type.clone()), values.clone())),
        other => Err(LatticeError::NotAStruct {
            kind: other.kind_name(),
        }),
    }
}

impl<R: Record> FromWire for Vec<Option<R>> {
    fn dest_name() -> &'static str {
        R::record_name()
    }

    fn check_type(ty: &WireType) -> Result<()> {
        check_array(ty, TypeCode::Struct, Self::dest_name())
    }

    fn decode_non_null(&mut self, value: &WireValue, ty: &WireType) -> Result<()> {
        let elem_ty = ty
            .array_element_type
            .as_deref()
            .ok_or(LatticeError::MissingArrayElementType)?;
        *self = decode_struct_array(elem_ty.struct_type.as_ref(), Some(list_value(value)?))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_value;
    use crate::record::FieldSpec;
    use lattice_types::{NullString, StructField};

    #[derive(Default, Debug, PartialEq)]
    struct Track {
        title: String,
        plays: i64,
        label: NullString,
    }

    impl Record for Track {
        fn record_name() -> &'static str {
            "Track"
        }

        fn field_specs() -> &'static [FieldSpec] {
            const SPECS: &[FieldSpec] = &[
                FieldSpec::named("title"),
                FieldSpec::named("plays"),
                FieldSpec::named("label"),
            ];
            SPECS
        }

        fn decode_field(&mut self, index: usize, value: &WireValue, ty: &WireType) -> Result<()> {
            match index {
                0 => decode_value(value, ty, &mut self.title),
                1 => decode_value(value, ty, &mut self.plays),
                2 => decode_value(value, ty, &mut self.label),
                _ => Err(LatticeError::InvalidFieldIndex {
                    record: Self::record_name(),
                    index,
                }),
            }
        }
    }

    fn track_type() -> StructType {
        StructType {
            fields: vec![
                StructField::new("title", WireType::string()),
                StructField::new("plays", WireType::int64()),
                StructField::new("label", WireType::string()),
            ],
        }
    }

    fn track_value(title: &str, plays: i64) -> WireValue {
        WireValue::List(vec![
            WireValue::String(title.to_owned()),
            WireValue::Integer(plays),
            WireValue::Null,
        ])
    }

    #[test]
    fn decode_struct_fills_members_and_defaults_the_rest() {
        let got: Track = decode_struct(Some(&track_type()), &track_value("Go", 7)).unwrap();
        assert_eq!(
            got,
            Track {
                title: "Go".to_owned(),
                plays: 7,
                label: NullString::default(),
            }
        );
    }

    #[test]
    fn partial_descriptor_leaves_unmentioned_members_alone() {
        let st = StructType {
            fields: vec![StructField::new("plays", WireType::int64())],
        };
        let got: Track = decode_struct(Some(&st), &WireValue::List(vec![WireValue::Integer(3)]))
            .unwrap();
        assert_eq!(got.plays, 3);
        assert_eq!(got.title, "");
    }

    #[test]
    fn null_struct_is_rejected() {
        let err = decode_struct::<Track>(Some(&track_type()), &WireValue::Null).unwrap_err();
        assert!(matches!(err, LatticeError::NullValue { dest: "Track" }));
    }

    #[test]
    fn non_list_payload_is_not_a_struct() {
        let err =
            decode_struct::<Track>(Some(&track_type()), &WireValue::Bool(true)).unwrap_err();
        assert!(matches!(err, LatticeError::NotAStruct { kind: "Bool" }));
    }

    #[test]
    fn missing_descriptor_is_a_precondition_failure() {
        let err = decode_struct::<Track>(None, &track_value("x", 0)).unwrap_err();
        assert!(matches!(err, LatticeError::MissingStructType));
    }

    #[test]
    fn unnamed_and_duplicate_wire_fields() {
        let unnamed = StructType {
            fields: vec![StructField::new("", WireType::string())],
        };
        let err = decode_struct::<Track>(
            Some(&unnamed),
            &WireValue::List(vec![WireValue::String("x".to_owned())]),
        )
        .unwrap_err();
        assert!(matches!(err, LatticeError::UnnamedField { index: 0 }));

        let duplicated = StructType {
            fields: vec![
                StructField::new("plays", WireType::int64()),
                StructField::new("plays", WireType::int64()),
            ],
        };
        let err = decode_struct::<Track>(
            Some(&duplicated),
            &WireValue::List(vec![WireValue::Integer(1), WireValue::Integer(2)]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LatticeError::DuplicateWireField { ref name } if name == "plays"
        ));
    }

    #[test]
    fn wire_field_without_a_member_names_record_and_field() {
        let st = StructType {
            fields: vec![StructField::new("bpm", WireType::int64())],
        };
        let err =
            decode_struct::<Track>(Some(&st), &WireValue::List(vec![WireValue::Integer(120)]))
                .unwrap_err();
        assert!(matches!(
            err,
            LatticeError::NoOrDupRecordField { record: "Track", ref field } if field == "bpm"
        ));
    }

    #[test]
    fn short_row_is_a_missing_value() {
        let err = decode_struct::<Track>(
            Some(&track_type()),
            &WireValue::List(vec![WireValue::String("only".to_owned())]),
        )
        .unwrap_err();
        assert!(matches!(err, LatticeError::MissingValue));
    }

    #[test]
    fn field_failures_are_decorated_with_the_field_name() {
        let err = decode_struct::<Track>(
            Some(&track_type()),
            &WireValue::List(vec![
                WireValue::String("t".to_owned()),
                WireValue::Null,
                WireValue::Null,
            ]),
        )
        .unwrap_err();
        let source = match err {
            LatticeError::StructField { name, source } if name == "plays" => source,
            other => panic!("unexpected error: {other}"),
        };
        assert!(matches!(*source, LatticeError::NullValue { dest: "i64" }));
    }

    #[test]
    fn struct_array_preserves_length_and_null_placement() {
        let got: Vec<Option<Track>> = decode_struct_array(
            Some(&track_type()),
            Some(&[
                track_value("a", 1),
                WireValue::Null,
                track_value("b", 2),
            ]),
        )
        .unwrap();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].as_ref().map(|t| t.plays), Some(1));
        assert!(got[1].is_none());
        assert_eq!(got[2].as_ref().map(|t| t.title.as_str()), Some("b"));
    }

    #[test]
    fn struct_array_through_decode_value() {
        let ty = WireType::array(WireType::strukt(track_type().fields));
        let mut dest: Vec<Option<Track>> = vec![Some(Track::default())];
        decode_value(
            &WireValue::List(vec![WireValue::Null, track_value("c", 5)]),
            &ty,
            &mut dest,
        )
        .unwrap();
        assert_eq!(dest.len(), 2);
        assert!(dest[0].is_none());

        let err = decode_value(
            &WireValue::List(vec![]),
            &WireType::array(WireType::int64()),
            &mut dest,
        )
        .unwrap_err();
        assert!(matches!(err, LatticeError::TypeMismatch { dest: "Track", .. }));
    }

    #[test]
    fn struct_array_element_failures_carry_the_index() {
        let err = decode_struct_array::<Track>(
            Some(&track_type()),
            Some(&[track_value("ok", 1), WireValue::Bool(false)]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LatticeError::ArrayElement { index: 1, element_type: "STRUCT", .. }
        ));
    }

    #[test]
    fn decode_row_keeps_descriptor_and_values() {
        let row = decode_row(Some(&track_type()), &track_value("r", 9)).unwrap();
        assert_eq!(row.struct_type().fields.len(), 3);
        assert_eq!(row.values()[1], WireValue::Integer(9));

        let err = decode_row(None, &track_value("r", 9)).unwrap_err();
        assert!(matches!(err, LatticeError::MissingStructType));
    }
}
