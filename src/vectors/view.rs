//! # Read-Only Indexed Views
//!
//! After a vector is parsed, application code looks records up by key through
//! one of three views. All three answer the same questions (`count`,
//! `contains_key`, `try_get`, `get`, `iter`) over a sorted buffer-backed vector
//! and differ only in what they remember between calls:
//!
//! | View | Backing vector | Lookup path | Repeated lookups |
//! |------|----------------|-------------|------------------|
//! | [`GreedyIndexedVector`] | [`GreedyVector`] | hash index, O(1) | same `Arc` |
//! | [`LazyIndexedVector`] | [`LazyVector`] | binary search + decode, every call | distinct `Arc`s |
//! | [`ProgressiveIndexedVector`] | [`ProgressiveVector`] | key cache, then binary search | same `Arc` |
//!
//! The progressive view keeps a key cache separate from the per-index cache of
//! its vector. Each key resolves once to [`Resolution::Present`] or
//! [`Resolution::Absent`] and stays that way for the life of the view, so a
//! miss is never searched twice.
//!
//! None of these types has a mutator. Code that holds one through the
//! [`IndexedMap`](super::IndexedMap) trait sees mutators that always fail with
//! `NotMutable`.
//!
//! ## Thread Safety
//!
//! The progressive view writes its caches through `&self` with `RefCell` and
//! `OnceCell`, so it is `!Sync`. Wrap it in a lock to share it.

use std::cell::{Cell, RefCell};
use std::hash::Hash;
use std::sync::Arc;

use eyre::{bail, ensure, Result};
use hashbrown::HashMap;

use super::buffer::VectorBuffer;
use super::codec::RecordCodec;
use super::key::{require_lookup_key, KeyProjection, LookupKey};
use super::policy::{ElementSource, GreedyVector, LazyVector, ProgressiveVector, RecordVector};
use super::search::search_sorted;
use crate::config::DeserializationMode;
use crate::error::IndexedVectorError;

/// Cached outcome of one key lookup in a progressive view.
#[derive(Debug)]
pub enum Resolution<R> {
    Unresolved,
    Present(Arc<R>),
    Absent,
}

impl<R> Clone for Resolution<R> {
    fn clone(&self) -> Self {
        match self {
            Resolution::Unresolved => Resolution::Unresolved,
            Resolution::Present(record) => Resolution::Present(Arc::clone(record)),
            Resolution::Absent => Resolution::Absent,
        }
    }
}

impl<R> Resolution<R> {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Resolution::Unresolved)
    }

    fn from_lookup(found: Option<&Arc<R>>) -> Self {
        match found {
            Some(record) => Resolution::Present(Arc::clone(record)),
            None => Resolution::Absent,
        }
    }
}

/// Storage-order iteration over any buffer-backed vector.
pub struct Entries<'v, R, K, V: ?Sized> {
    vector: &'v V,
    projection: KeyProjection<R, K>,
    next: usize,
    len: usize,
}

impl<'v, R, K, V: RecordVector<R> + ?Sized> Entries<'v, R, K, V> {
    pub(crate) fn new(vector: &'v V, projection: KeyProjection<R, K>) -> Self {
        Self {
            vector,
            projection,
            next: 0,
            len: vector.len(),
        }
    }
}

impl<R, K: Clone, V: RecordVector<R> + ?Sized> Iterator for Entries<'_, R, K, V> {
    type Item = Result<(K, Arc<R>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let entry = self.vector.get(index).and_then(|record| {
            let key = self.projection.stored_key(&record, index)?.clone();
            Ok((key, record))
        });
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

fn check_key_slot<R, K>(buffer: &VectorBuffer<'_>, projection: &KeyProjection<R, K>) -> Result<()> {
    ensure!(
        buffer.key_slot() == projection.slot(),
        "vector was written with key slot {} but the record projection uses slot {}",
        buffer.key_slot(),
        projection.slot()
    );
    Ok(())
}

// ============================================================================
// Greedy
// ============================================================================

pub struct GreedyIndexedVector<R, K> {
    vector: GreedyVector<R>,
    index: HashMap<K, usize>,
    projection: KeyProjection<R, K>,
}

impl<R, K: Hash + Eq + Clone> GreedyIndexedVector<R, K> {
    pub fn parse<C: RecordCodec<R>>(
        buffer: VectorBuffer<'_>,
        codec: C,
        projection: KeyProjection<R, K>,
    ) -> Result<Self> {
        check_key_slot(&buffer, &projection)?;
        let vector = GreedyVector::decode_all(&ElementSource::new(buffer, codec))?;

        let mut index = HashMap::with_capacity(vector.len());
        for (i, record) in vector.items().iter().enumerate() {
            let key = projection.stored_key(record, i)?;
            // first occurrence wins if the writer let a duplicate through
            index.entry(key.clone()).or_insert(i);
        }

        Ok(Self {
            vector,
            index,
            projection,
        })
    }

    pub fn count(&self) -> usize {
        self.vector.len()
    }

    pub fn is_read_only(&self) -> bool {
        true
    }

    pub fn contains_key<Q: LookupKey<K>>(&self, key: Q) -> Result<bool> {
        Ok(self.try_get(key)?.is_some())
    }

    pub fn try_get<Q: LookupKey<K>>(&self, key: Q) -> Result<Option<Arc<R>>> {
        let key = require_lookup_key(&key)?;
        Ok(self
            .index
            .get(key)
            .map(|&i| Arc::clone(&self.vector.items()[i])))
    }

    pub fn get<Q: LookupKey<K>>(&self, key: Q) -> Result<Arc<R>> {
        match self.try_get(key)? {
            Some(record) => Ok(record),
            None => bail!(IndexedVectorError::KeyNotFound),
        }
    }

    pub fn iter(&self) -> Entries<'_, R, K, GreedyVector<R>> {
        Entries::new(&self.vector, self.projection)
    }
}

// ============================================================================
// Lazy
// ============================================================================

pub struct LazyIndexedVector<'a, R, K, C> {
    vector: LazyVector<'a, R, C>,
    projection: KeyProjection<R, K>,
}

impl<'a, R, K: Ord + Clone, C: RecordCodec<R>> LazyIndexedVector<'a, R, K, C> {
    pub fn parse(
        buffer: VectorBuffer<'a>,
        codec: C,
        projection: KeyProjection<R, K>,
    ) -> Result<Self> {
        check_key_slot(&buffer, &projection)?;
        Ok(Self {
            vector: LazyVector::new(ElementSource::new(buffer, codec)),
            projection,
        })
    }

    pub fn count(&self) -> usize {
        self.vector.len()
    }

    pub fn is_read_only(&self) -> bool {
        true
    }

    pub fn contains_key<Q: LookupKey<K>>(&self, key: Q) -> Result<bool> {
        Ok(self.try_get(key)?.is_some())
    }

    pub fn try_get<Q: LookupKey<K>>(&self, key: Q) -> Result<Option<Arc<R>>> {
        search_sorted(&self.vector, &self.projection, key)
    }

    pub fn get<Q: LookupKey<K>>(&self, key: Q) -> Result<Arc<R>> {
        match self.try_get(key)? {
            Some(record) => Ok(record),
            None => bail!(IndexedVectorError::KeyNotFound),
        }
    }

    pub fn iter(&self) -> Entries<'_, R, K, LazyVector<'a, R, C>> {
        Entries::new(&self.vector, self.projection)
    }
}

// ============================================================================
// Progressive
// ============================================================================

pub struct ProgressiveIndexedVector<'a, R, K, C> {
    vector: ProgressiveVector<'a, R, C>,
    resolved: RefCell<HashMap<K, Resolution<R>>>,
    searches: Cell<usize>,
    projection: KeyProjection<R, K>,
}

impl<'a, R, K: Ord + Hash + Clone, C: RecordCodec<R>> ProgressiveIndexedVector<'a, R, K, C> {
    pub fn parse(
        buffer: VectorBuffer<'a>,
        codec: C,
        projection: KeyProjection<R, K>,
    ) -> Result<Self> {
        check_key_slot(&buffer, &projection)?;
        Ok(Self {
            vector: ProgressiveVector::new(ElementSource::new(buffer, codec)),
            resolved: RefCell::new(HashMap::new()),
            searches: Cell::new(0),
            projection,
        })
    }

    pub fn count(&self) -> usize {
        self.vector.len()
    }

    pub fn is_read_only(&self) -> bool {
        true
    }

    /// What this view currently remembers about `key`.
    pub fn resolution(&self, key: &K) -> Resolution<R> {
        self.resolved
            .borrow()
            .get(key)
            .cloned()
            .unwrap_or(Resolution::Unresolved)
    }

    /// Number of elements decoded so far, by lookup or iteration.
    pub fn decoded_count(&self) -> usize {
        self.vector.decoded_count()
    }

    /// Number of binary searches run so far. Each distinct key costs at most one.
    pub fn search_count(&self) -> usize {
        self.searches.get()
    }

    pub fn contains_key<Q: LookupKey<K>>(&self, key: Q) -> Result<bool> {
        Ok(self.try_get(key)?.is_some())
    }

    pub fn try_get<Q: LookupKey<K>>(&self, key: Q) -> Result<Option<Arc<R>>> {
        let key = require_lookup_key(&key)?;
        match self.resolution(key) {
            Resolution::Present(record) => return Ok(Some(record)),
            Resolution::Absent => return Ok(None),
            Resolution::Unresolved => {}
        }

        let found = search_sorted(&self.vector, &self.projection, key)?;
        self.searches.set(self.searches.get() + 1);
        tracing::trace!(
            found = found.is_some(),
            searches = self.searches.get(),
            "progressive view resolved key"
        );
        self.resolved
            .borrow_mut()
            .insert(key.clone(), Resolution::from_lookup(found.as_ref()));
        Ok(found)
    }

    pub fn get<Q: LookupKey<K>>(&self, key: Q) -> Result<Arc<R>> {
        match self.try_get(key)? {
            Some(record) => Ok(record),
            None => bail!(IndexedVectorError::KeyNotFound),
        }
    }

    pub fn iter(&self) -> Entries<'_, R, K, ProgressiveVector<'a, R, C>> {
        Entries::new(&self.vector, self.projection)
    }
}

// ============================================================================
// Parse-time dispatch
// ============================================================================

/// One of the three read-only views, chosen by [`DeserializationMode`].
pub enum ReadOnlyIndexedVector<'a, R, K, C> {
    Greedy(GreedyIndexedVector<R, K>),
    Lazy(LazyIndexedVector<'a, R, K, C>),
    Progressive(ProgressiveIndexedVector<'a, R, K, C>),
}

/// Parses a serialized vector into the view `mode` selects.
pub fn parse_indexed_vector<'a, R, K, C>(
    data: &'a [u8],
    mode: DeserializationMode,
    projection: KeyProjection<R, K>,
    codec: C,
) -> Result<ReadOnlyIndexedVector<'a, R, K, C>>
where
    K: Ord + Hash + Clone,
    C: RecordCodec<R>,
{
    let buffer = VectorBuffer::new(data)?;
    tracing::debug!(
        len = buffer.len(),
        key_slot = buffer.key_slot(),
        mode = mode.name(),
        "parsing indexed vector"
    );

    Ok(match mode {
        DeserializationMode::Greedy => {
            ReadOnlyIndexedVector::Greedy(GreedyIndexedVector::parse(buffer, codec, projection)?)
        }
        DeserializationMode::Lazy => {
            ReadOnlyIndexedVector::Lazy(LazyIndexedVector::parse(buffer, codec, projection)?)
        }
        DeserializationMode::Progressive => ReadOnlyIndexedVector::Progressive(
            ProgressiveIndexedVector::parse(buffer, codec, projection)?,
        ),
    })
}

impl<'a, R, K, C> ReadOnlyIndexedVector<'a, R, K, C>
where
    K: Ord + Hash + Clone,
    C: RecordCodec<R>,
{
    pub fn mode(&self) -> DeserializationMode {
        match self {
            ReadOnlyIndexedVector::Greedy(_) => DeserializationMode::Greedy,
            ReadOnlyIndexedVector::Lazy(_) => DeserializationMode::Lazy,
            ReadOnlyIndexedVector::Progressive(_) => DeserializationMode::Progressive,
        }
    }

    pub fn count(&self) -> usize {
        match self {
            ReadOnlyIndexedVector::Greedy(v) => v.count(),
            ReadOnlyIndexedVector::Lazy(v) => v.count(),
            ReadOnlyIndexedVector::Progressive(v) => v.count(),
        }
    }

    pub fn is_read_only(&self) -> bool {
        true
    }

    pub fn contains_key<Q: LookupKey<K>>(&self, key: Q) -> Result<bool> {
        Ok(self.try_get(key)?.is_some())
    }

    pub fn try_get<Q: LookupKey<K>>(&self, key: Q) -> Result<Option<Arc<R>>> {
        match self {
            ReadOnlyIndexedVector::Greedy(v) => v.try_get(key),
            ReadOnlyIndexedVector::Lazy(v) => v.try_get(key),
            ReadOnlyIndexedVector::Progressive(v) => v.try_get(key),
        }
    }

    pub fn get<Q: LookupKey<K>>(&self, key: Q) -> Result<Arc<R>> {
        match self.try_get(key)? {
            Some(record) => Ok(record),
            None => bail!(IndexedVectorError::KeyNotFound),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = Result<(K, Arc<R>)>> + '_> {
        match self {
            ReadOnlyIndexedVector::Greedy(v) => Box::new(v.iter()),
            ReadOnlyIndexedVector::Lazy(v) => Box::new(v.iter()),
            ReadOnlyIndexedVector::Progressive(v) => Box::new(v.iter()),
        }
    }
}
