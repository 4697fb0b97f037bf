//! Transient rows produced while decoding STRUCT array elements.

use std::sync::Arc;

use crate::wire::{StructType, WireValue};

/// A decoded-but-not-yet-materialized STRUCT value: the struct's field
/// descriptors paired with the element's raw wire values.
///
/// Rows are produced while decoding a struct array element and consumed
/// immediately by struct decoding; they own no state beyond that codec
/// invocation. The descriptor is shared across all elements of one
/// array.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    struct_type: Arc<StructType>,
    values: Vec<WireValue>,
}

impl Row {
    /// Pair a shared struct descriptor with one element's wire values.
    pub fn new(struct_type: Arc<StructType>, values: Vec<WireValue>) -> Self {
        Self {
            struct_type,
            values,
        }
    }

    /// The struct descriptor describing `values`. The `Arc` is shared
    /// across all rows of one decoded array.
    pub fn struct_type(&self) -> &Arc<StructType> {
        &self.struct_type
    }

    /// The raw wire values, in declared field order.
    pub fn values(&self) -> &[WireValue] {
        &self.values
    }
}

/// A STRUCT array element that may be NULL.
///
/// The store does not currently emit NULL struct elements, but the
/// codec accepts and represents them if they appear.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NullRow {
    pub row: Row,
    /// True if `row` is not NULL.
    pub valid: bool,
}
