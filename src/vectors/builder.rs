//! # IndexedVector - Mutable Builder
//!
//! `IndexedVector` accumulates records keyed by their projected key before the
//! vector is written. It behaves like an insertion-ordered map:
//!
//! - `add` inserts only when the key is new
//! - `add_or_replace` overwrites in place, keeping the entry's original
//!   iteration position
//! - `remove` shifts later entries down, so iteration order stays the order of
//!   first insertion among the survivors
//!
//! ## Lifecycle
//!
//! ```text
//! new() --add/replace/remove/clear--> freeze() --write_vector()--> bytes
//! ```
//!
//! `freeze` is one-way and idempotent. Afterwards every mutator fails with
//! `NotMutable` and `is_read_only` reports `true`. Freezing does not sort;
//! the writer orders entries by key when it serializes them.
//!
//! ## Usage
//!
//! ```ignore
//! let mut vector = IndexedVector::<Member, String>::new();
//! assert!(vector.add(member("b"))?);
//! assert!(!vector.add(member("b"))?);
//! vector.freeze();
//! let bytes = write_vector(&vector, FieldCodec)?;
//! ```

use std::hash::Hash;
use std::sync::Arc;

use eyre::{bail, Result};
use indexmap::map::Entry;
use indexmap::IndexMap;

use super::key::{require_lookup_key, KeyProjection, LookupKey, SortableRecord};
use crate::error::IndexedVectorError;

pub struct IndexedVector<R, K> {
    entries: IndexMap<K, Arc<R>>,
    projection: KeyProjection<R, K>,
    frozen: bool,
}

impl<R: SortableRecord> IndexedVector<R, R::Key> {
    pub fn new() -> Self {
        Self::with_projection(R::key_projection())
    }
}

impl<R: SortableRecord> Default for IndexedVector<R, R::Key> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, K: Hash + Eq + Clone> IndexedVector<R, K> {
    pub fn with_projection(projection: KeyProjection<R, K>) -> Self {
        Self {
            entries: IndexMap::new(),
            projection,
            frozen: false,
        }
    }

    pub fn projection(&self) -> &KeyProjection<R, K> {
        &self.projection
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.frozen {
            bail!(IndexedVectorError::NotMutable);
        }
        Ok(())
    }

    /// Inserts `record` unless its key is already present.
    pub fn add(&mut self, record: R) -> Result<bool> {
        self.ensure_mutable()?;
        let key = self.projection.require_key(&record)?.clone();
        match self.entries.entry(key) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(record));
                Ok(true)
            }
        }
    }

    /// Inserts `record`, overwriting any entry with the same key in place.
    pub fn add_or_replace(&mut self, record: R) -> Result<()> {
        self.ensure_mutable()?;
        let key = self.projection.require_key(&record)?.clone();
        self.entries.insert(key, Arc::new(record));
        Ok(())
    }

    pub fn remove<Q: LookupKey<K>>(&mut self, key: Q) -> Result<bool> {
        self.ensure_mutable()?;
        let key = require_lookup_key(&key)?;
        Ok(self.entries.shift_remove(key).is_some())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.ensure_mutable()?;
        self.entries.clear();
        Ok(())
    }

    pub fn freeze(&mut self) {
        if !self.frozen {
            tracing::debug!(count = self.entries.len(), "indexed vector frozen");
        }
        self.frozen = true;
    }

    pub fn is_read_only(&self) -> bool {
        self.frozen
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key<Q: LookupKey<K>>(&self, key: Q) -> Result<bool> {
        let key = require_lookup_key(&key)?;
        Ok(self.entries.contains_key(key))
    }

    pub fn try_get<Q: LookupKey<K>>(&self, key: Q) -> Result<Option<Arc<R>>> {
        let key = require_lookup_key(&key)?;
        Ok(self.entries.get(key).cloned())
    }

    pub fn get<Q: LookupKey<K>>(&self, key: Q) -> Result<Arc<R>> {
        match self.try_get(key)? {
            Some(record) => Ok(record),
            None => bail!(IndexedVectorError::KeyNotFound),
        }
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, K, Arc<R>> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, K, Arc<R>> {
        self.entries.keys()
    }
}

impl<'v, R, K> IntoIterator for &'v IndexedVector<R, K> {
    type Item = (&'v K, &'v Arc<R>);
    type IntoIter = indexmap::map::Iter<'v, K, Arc<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<R, K: std::fmt::Debug> std::fmt::Debug for IndexedVector<R, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedVector")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .field("frozen", &self.frozen)
            .finish()
    }
}
