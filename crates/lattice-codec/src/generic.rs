//! Generic passthrough: a wire value carried together with its type
//! descriptor, untouched by the typed codec.
//!
//! Useful for columns whose type is not known at compile time and for
//! relaying values between stores. The pair owns its data outright, so
//! mutating a decoded copy never reaches back into the source row.

use lattice_error::Result;
use lattice_types::{TypeCode, WireType, WireValue};

use crate::decode::{decode_value, FromWire};
use crate::encode::{encode_value, ToWire};

/// A wire value bundled with the descriptor that explains it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenericColumnValue {
    pub ty: WireType,
    pub value: WireValue,
}

impl GenericColumnValue {
    pub fn new(ty: WireType, value: WireValue) -> Self {
        Self { ty, value }
    }

    /// Encodes a native value into its wire form and bundles the
    /// descriptor alongside.
    pub fn from_native<T: ToWire>(native: &T) -> Result<Self> {
        let (value, ty) = encode_value(native)?;
        Ok(Self {
            ty: ty.unwrap_or_default(),
            value,
        })
    }

    /// Decodes the carried value into a typed destination.
    pub fn decode<T: FromWire>(&self, dest: &mut T) -> Result<()> {
        decode_value(&self.value, &self.ty, dest)
    }
}

impl FromWire for GenericColumnValue {
    fn dest_name() -> &'static str {
        "GenericColumnValue"
    }

    // Any descriptor is acceptable; the pair records it verbatim.
    fn check_type(_ty: &WireType) -> Result<()> {
        Ok(())
    }

    fn decode_null(&mut self, ty: &WireType) -> Result<()> {
        self.ty = ty.clone();
        self.value = WireValue::Null;
        Ok(())
    }

    fn decode_non_null(&mut self, value: &WireValue, ty: &WireType) -> Result<()> {
        self.ty = ty.clone();
        self.value = value.clone();
        Ok(())
    }
}

impl ToWire for GenericColumnValue {
    fn to_wire(&self) -> Result<(WireValue, Option<WireType>)> {
        let ty = match self.ty.code {
            TypeCode::Unspecified => None,
            _ => Some(self.ty.clone()),
        };
        Ok((self.value.clone(), ty))
    }
}
