//! The [`Record`] trait: the static shape description that lets the
//! struct codec decode wire rows into plain native structs.
//!
//! Implementations are normally generated by `#[derive(Record)]`; the
//! trait is kept small and object-free so the derive output stays
//! mechanical. The field table is positional and the codec addresses
//! members by their index in it.

use lattice_types::{WireType, WireValue};

use lattice_error::Result;

/// Tag metadata for one member of a record shape.
///
/// `name` is the declared member name; everything else comes from the
/// member's `#[lattice(...)]` attribute and is consumed by
/// [`TagMode::resolve`].
///
/// [`TagMode::resolve`]: crate::fields::TagMode::resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Declared member name.
    pub name: &'static str,
    /// `rename = "..."` override, `"-"` to exclude in rename mode.
    pub rename: Option<&'static str>,
    /// `family = "..."` half of the family-qualified name.
    pub family: Option<&'static str>,
    /// `column = "..."` half, `"-"` to exclude in family-column mode.
    pub column: Option<&'static str>,
    /// `skip`: the member never resolves under any mode.
    pub skip: bool,
}

impl FieldSpec {
    /// A spec with no tag metadata, resolving to the declared name.
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            rename: None,
            family: None,
            column: None,
            skip: false,
        }
    }
}

/// A native struct the row codec can decode into.
pub trait Record: Default + 'static {
    /// Shape name used in error messages.
    fn record_name() -> &'static str;

    /// The member table, one entry per decodable member, in declaration
    /// order.
    fn field_specs() -> &'static [FieldSpec];

    /// Decodes one wire value into the member at `index` of the table.
    fn decode_field(&mut self, index: usize, value: &WireValue, ty: &WireType) -> Result<()>;
}
