//! Wire-level data model for the Lattice tabular store.
//!
//! The store's type system is small and fixed: seven scalar kinds,
//! homogeneous ARRAYs, and nested STRUCT/row types. Every value
//! crossing the wire is self-describing — a [`WireValue`] payload is
//! only meaningful paired with the [`WireType`] descriptor that arrived
//! alongside it. This crate holds the descriptors, the value union, the
//! nullable scalar wrappers, and the transient [`Row`] produced while
//! decoding struct array elements. The codec that interprets them lives
//! in `lattice-codec`.

pub mod nullable;
pub mod row;
pub mod wire;

pub use nullable::{NullBool, NullDate, NullFloat64, NullInt64, NullString, NullTimestamp};
pub use row::{NullRow, Row};
pub use wire::{StructField, StructType, TypeCode, WireType, WireValue};
