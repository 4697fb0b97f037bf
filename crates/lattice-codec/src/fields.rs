//! Field-tag resolution and the process-lifetime cache of resolved
//! record shapes.
//!
//! Resolving a record's members to wire field names walks the member
//! table once, applies the deployment's tag convention, and rejects
//! collisions. The result is immutable, so it is built once per shape
//! and shared behind an `Arc` for the life of the process.

use std::any::TypeId;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, trace};

use lattice_error::{LatticeError, Result};

use crate::record::{FieldSpec, Record};

/// Tag convention in force for a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMode {
    /// A single rename override; `"-"` excludes the member.
    Rename,
    /// Family-qualified column names. The resolved name is
    /// `family:column` when both halves are tagged, else the bare
    /// column; `column = "-"` excludes the member.
    FamilyColumn,
}

impl TagMode {
    /// Resolves one member spec to its wire field name, or `None` when
    /// the member is excluded from decoding.
    pub fn resolve(self, spec: &FieldSpec) -> Option<Cow<'static, str>> {
        if spec.skip {
            return None;
        }
        match self {
            Self::Rename => match spec.rename {
                Some("-") => None,
                Some(rename) => Some(Cow::Borrowed(rename)),
                None => Some(Cow::Borrowed(spec.name)),
            },
            Self::FamilyColumn => match (spec.family, spec.column) {
                (_, Some("-")) => None,
                (Some(family), Some(column)) => Some(Cow::Owned(format!("{family}:{column}"))),
                (_, Some(column)) => Some(Cow::Borrowed(column)),
                (_, None) => Some(Cow::Borrowed(spec.name)),
            },
        }
    }
}

/// The resolved wire-name to member-index mapping for one record
/// shape.
#[derive(Debug)]
pub struct ResolvedFields {
    record: &'static str,
    by_name: HashMap<String, usize>,
}

impl ResolvedFields {
    fn build<R: Record>(mode: TagMode) -> Result<Self> {
        let specs = R::field_specs();
        let mut by_name = HashMap::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            let Some(name) = mode.resolve(spec) else {
                continue;
            };
            let name = name.into_owned();
            if by_name.insert(name.clone(), index).is_some() {
                return Err(LatticeError::DuplicateTagName {
                    record: R::record_name(),
                    name,
                });
            }
        }
        Ok(Self {
            record: R::record_name(),
            by_name,
        })
    }

    /// The record shape this mapping was built for.
    pub fn record(&self) -> &'static str {
        self.record
    }

    /// Member index for a wire field name, if any member resolved to
    /// it.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Number of decodable members.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

enum CacheEntry {
    Ready(Arc<ResolvedFields>),
    // Collisions are a property of the shape, not the call, so they
    // fail the same way on every lookup.
    Collision {
        record: &'static str,
        name: String,
    },
}

/// Cache of [`ResolvedFields`] keyed by the record's `TypeId`.
///
/// Lookups take the read lock only; a miss builds outside any lock and
/// races to insert, and losers adopt the entry that won. Both sides of
/// a lost race built the identical mapping, so readers never observe
/// disagreement.
pub struct FieldCache {
    mode: TagMode,
    entries: RwLock<HashMap<TypeId, CacheEntry>>,
}

static GLOBAL: OnceLock<FieldCache> = OnceLock::new();

impl FieldCache {
    /// An empty cache using `mode` for every shape it resolves.
    pub fn new(mode: TagMode) -> Self {
        Self {
            mode,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide cache, created on first use with
    /// [`TagMode::FamilyColumn`]. Call [`FieldCache::install_global`]
    /// before any decoding to pick the other convention.
    pub fn global() -> &'static FieldCache {
        GLOBAL.get_or_init(|| FieldCache::new(TagMode::FamilyColumn))
    }

    /// Sets the process-wide cache's tag convention. First caller
    /// wins; returns the cache either way.
    pub fn install_global(mode: TagMode) -> &'static FieldCache {
        GLOBAL.get_or_init(|| FieldCache::new(mode))
    }

    /// The convention this cache resolves with.
    pub fn mode(&self) -> TagMode {
        self.mode
    }

    /// The resolved mapping for `R`, building and caching it on first
    /// use.
    pub fn resolved<R: Record>(&self) -> Result<Arc<ResolvedFields>> {
        let key = TypeId::of::<R>();
        if let Some(entry) = self.entries.read().get(&key) {
            return match entry {
                CacheEntry::Ready(fields) => {
                    trace!(record = fields.record(), "field cache hit");
                    Ok(Arc::clone(fields))
                }
                CacheEntry::Collision { record, name } => Err(LatticeError::DuplicateTagName {
                    record: *record,
                    name: name.clone(),
                }),
            };
        }

        let entry = match ResolvedFields::build::<R>(self.mode) {
            Ok(fields) => {
                debug!(
                    record = fields.record(),
                    fields = fields.len(),
                    mode = ?self.mode,
                    "resolved record fields"
                );
                CacheEntry::Ready(Arc::new(fields))
            }
            Err(LatticeError::DuplicateTagName { record, name }) => {
                debug!(record, name = %name, "record field names collide");
                CacheEntry::Collision { record, name }
            }
            Err(other) => return Err(other),
        };

        let mut entries = self.entries.write();
        let entry = entries.entry(key).or_insert(entry);
        match entry {
            CacheEntry::Ready(fields) => Ok(Arc::clone(fields)),
            CacheEntry::Collision { record, name } => Err(LatticeError::DuplicateTagName {
                record: *record,
                name: name.clone(),
            }),
        }
    }
}
