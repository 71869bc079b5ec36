//! # Sorted Vector Search
//!
//! Key lookup against a buffer-backed vector whose elements are sorted
//! ascending by key with no duplicates. The vector itself carries no index:
//! each probe fetches the middle element through [`RecordVector::get`] and
//! projects its key, so every comparison pays the active policy's decode cost.
//!
//! ## Complexity
//!
//! O(log n) probes. A greedy or warmed-up progressive vector makes each probe
//! an `Arc` clone; a lazy vector decodes on every probe of every call.
//!
//! ## Unsorted Input
//!
//! Sortedness is the writer's job and is not checked here. With duplicate keys
//! the search returns whichever matching element a probe lands on first.

use std::cmp::Ordering;
use std::sync::Arc;

use eyre::Result;

use super::key::{require_lookup_key, KeyProjection, LookupKey};
use super::policy::RecordVector;

/// Finds the element whose key equals `key`.
///
/// A null `key` fails with `InvalidArgument` before the vector is touched.
pub fn search_sorted<R, K, V, Q>(
    vector: &V,
    projection: &KeyProjection<R, K>,
    key: Q,
) -> Result<Option<Arc<R>>>
where
    K: Ord,
    V: RecordVector<R> + ?Sized,
    Q: LookupKey<K>,
{
    let target = require_lookup_key(&key)?;
    Ok(search_index(vector, projection, target)?.map(|(_, record)| record))
}

/// Like [`search_sorted`], also returning the element's position.
pub fn search_index<R, K, V>(
    vector: &V,
    projection: &KeyProjection<R, K>,
    target: &K,
) -> Result<Option<(usize, Arc<R>)>>
where
    K: Ord,
    V: RecordVector<R> + ?Sized,
{
    let len = vector.len();
    let mut low = 0usize;
    let mut high = len;
    let mut probes = 0u32;

    while low < high {
        let mid = low + (high - low) / 2;
        let record = vector.get(mid)?;
        probes += 1;

        match projection.stored_key(&record, mid)?.cmp(target) {
            Ordering::Equal => {
                tracing::trace!(len, probes, found = true, "sorted vector search");
                return Ok(Some((mid, record)));
            }
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
        }
    }

    tracing::trace!(len, probes, found = false, "sorted vector search");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{error_kind, IndexedVectorError};
    use std::cell::Cell;

    #[derive(Debug)]
    struct Entry {
        id: Option<i32>,
    }

    fn entry_id(entry: &Entry) -> Option<&i32> {
        entry.id.as_ref()
    }

    const ENTRY_KEY: KeyProjection<Entry, i32> = KeyProjection::new(entry_id, 0);

    struct CountingVector {
        items: Vec<Arc<Entry>>,
        gets: Cell<usize>,
    }

    impl CountingVector {
        fn with_ids(ids: impl IntoIterator<Item = i32>) -> Self {
            Self {
                items: ids
                    .into_iter()
                    .map(|id| Arc::new(Entry { id: Some(id) }))
                    .collect(),
                gets: Cell::new(0),
            }
        }
    }

    impl RecordVector<Entry> for CountingVector {
        fn len(&self) -> usize {
            self.items.len()
        }

        fn get(&self, index: usize) -> Result<Arc<Entry>> {
            self.gets.set(self.gets.get() + 1);
            Ok(Arc::clone(&self.items[index]))
        }
    }

    #[test]
    fn finds_every_present_key() {
        let vector = CountingVector::with_ids((0..100).map(|i| i * 3));
        for i in 0..100 {
            let (idx, found) = search_index(&vector, &ENTRY_KEY, &(i * 3)).unwrap().unwrap();
            assert_eq!(idx, i as usize);
            assert_eq!(found.id, Some(i * 3));
        }
    }

    #[test]
    fn misses_keys_between_and_beyond_elements() {
        let vector = CountingVector::with_ids((0..50).map(|i| i * 2));
        for probe in [-1, 1, 51, 97, 99, 1000, i32::MIN, i32::MAX] {
            assert!(search_sorted(&vector, &ENTRY_KEY, &probe).unwrap().is_none());
        }
    }

    #[test]
    fn empty_vector_never_probes() {
        let vector = CountingVector::with_ids(std::iter::empty());
        assert!(search_sorted(&vector, &ENTRY_KEY, &5).unwrap().is_none());
        assert_eq!(vector.gets.get(), 0);
    }

    #[test]
    fn probe_count_is_logarithmic() {
        let vector = CountingVector::with_ids(0..1024);
        search_sorted(&vector, &ENTRY_KEY, &1023).unwrap();
        assert!(vector.gets.get() <= 11, "took {} probes", vector.gets.get());
    }

    #[test]
    fn null_key_fails_before_any_probe() {
        let vector = CountingVector::with_ids(0..10);
        let err = search_sorted(&vector, &ENTRY_KEY, None::<&i32>).unwrap_err();
        assert_eq!(
            error_kind(&err),
            Some(&IndexedVectorError::InvalidArgument { param: "key" })
        );
        assert_eq!(vector.gets.get(), 0);
    }

    #[test]
    fn element_without_key_is_a_decode_error() {
        let vector = CountingVector {
            items: vec![Arc::new(Entry { id: None })],
            gets: Cell::new(0),
        };
        let err = search_sorted(&vector, &ENTRY_KEY, &1).unwrap_err();
        assert!(error_kind(&err).is_none());
    }
}
