//! Nullable scalar wrappers.
//!
//! The store's scalar columns are nullable; plain Rust scalars have no
//! way to represent a wire NULL, so each scalar kind gets a
//! `{ value, valid }` wrapper. `valid == false` means the column was
//! NULL and forces `value` to its zero form.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// A STRING column value that may be NULL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NullString {
    pub value: String,
    /// True if `value` is not NULL.
    pub valid: bool,
}

/// An INT64 column value that may be NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NullInt64 {
    pub value: i64,
    /// True if `value` is not NULL.
    pub valid: bool,
}

/// A FLOAT64 column value that may be NULL.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NullFloat64 {
    pub value: f64,
    /// True if `value` is not NULL.
    pub valid: bool,
}

/// A BOOL column value that may be NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NullBool {
    pub value: bool,
    /// True if `value` is not NULL.
    pub valid: bool,
}

/// A TIMESTAMP column value that may be NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullTimestamp {
    pub value: DateTime<Utc>,
    /// True if `value` is not NULL.
    pub valid: bool,
}

impl Default for NullTimestamp {
    fn default() -> Self {
        Self {
            value: DateTime::<Utc>::UNIX_EPOCH,
            valid: false,
        }
    }
}

/// A DATE column value that may be NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullDate {
    pub value: NaiveDate,
    /// True if `value` is not NULL.
    pub valid: bool,
}

impl Default for NullDate {
    fn default() -> Self {
        Self {
            value: NaiveDate::default(),
            valid: false,
        }
    }
}

macro_rules! nullable_from {
    ($wrapper:ident, $inner:ty) => {
        impl From<$inner> for $wrapper {
            fn from(value: $inner) -> Self {
                Self { value, valid: true }
            }
        }
    };
}

nullable_from!(NullString, String);
nullable_from!(NullInt64, i64);
nullable_from!(NullFloat64, f64);
nullable_from!(NullBool, bool);
nullable_from!(NullTimestamp, DateTime<Utc>);
nullable_from!(NullDate, NaiveDate);

impl fmt::Display for NullString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return f.write_str("<null>");
        }
        write!(f, "{:?}", self.value)
    }
}

impl fmt::Display for NullInt64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return f.write_str("<null>");
        }
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for NullFloat64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return f.write_str("<null>");
        }
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for NullBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return f.write_str("<null>");
        }
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for NullTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return f.write_str("<null>");
        }
        write!(f, "{:?}", self.value.to_rfc3339())
    }
}

impl fmt::Display for NullDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return f.write_str("<null>");
        }
        write!(f, "{:?}", self.value.to_string())
    }
}
