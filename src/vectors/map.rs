//! # IndexedMap - Shared Key→Record Contract
//!
//! Object-safe surface implemented by the builder and every read-only view,
//! for code that wants to treat "an indexed vector" uniformly regardless of
//! where it came from. Keys are passed as `Option<&K>`; `None` is a null key.
//!
//! The builder's mutators work until it is frozen. The views' mutators always
//! fail with `NotMutable`, and their `freeze` does nothing.

use std::hash::Hash;
use std::sync::Arc;

use eyre::{bail, Result};

use super::builder::IndexedVector;
use super::codec::RecordCodec;
use super::view::{
    GreedyIndexedVector, LazyIndexedVector, ProgressiveIndexedVector, ReadOnlyIndexedVector,
};
use crate::error::IndexedVectorError;

pub type EntryIter<'v, K, R> = Box<dyn Iterator<Item = Result<(K, Arc<R>)>> + 'v>;

pub trait IndexedMap<K, R> {
    fn count(&self) -> usize;

    fn is_read_only(&self) -> bool;

    fn freeze(&mut self);

    fn try_get(&self, key: Option<&K>) -> Result<Option<Arc<R>>>;

    fn contains_key(&self, key: Option<&K>) -> Result<bool> {
        Ok(self.try_get(key)?.is_some())
    }

    fn get(&self, key: Option<&K>) -> Result<Arc<R>> {
        match self.try_get(key)? {
            Some(record) => Ok(record),
            None => bail!(IndexedVectorError::KeyNotFound),
        }
    }

    fn entries(&self) -> EntryIter<'_, K, R>;

    fn add(&mut self, record: R) -> Result<bool>;

    fn add_or_replace(&mut self, record: R) -> Result<()>;

    fn remove(&mut self, key: Option<&K>) -> Result<bool>;

    fn clear(&mut self) -> Result<()>;
}

impl<R, K: Hash + Eq + Clone> IndexedMap<K, R> for IndexedVector<R, K> {
    fn count(&self) -> usize {
        IndexedVector::count(self)
    }

    fn is_read_only(&self) -> bool {
        IndexedVector::is_read_only(self)
    }

    fn freeze(&mut self) {
        IndexedVector::freeze(self)
    }

    fn try_get(&self, key: Option<&K>) -> Result<Option<Arc<R>>> {
        IndexedVector::try_get(self, key)
    }

    fn entries(&self) -> EntryIter<'_, K, R> {
        Box::new(
            self.iter()
                .map(|(key, record)| Ok::<_, eyre::Report>((key.clone(), Arc::clone(record)))),
        )
    }

    fn add(&mut self, record: R) -> Result<bool> {
        IndexedVector::add(self, record)
    }

    fn add_or_replace(&mut self, record: R) -> Result<()> {
        IndexedVector::add_or_replace(self, record)
    }

    fn remove(&mut self, key: Option<&K>) -> Result<bool> {
        IndexedVector::remove(self, key)
    }

    fn clear(&mut self) -> Result<()> {
        IndexedVector::clear(self)
    }
}

/// Implements `IndexedMap` for a view type by delegating reads to its inherent
/// methods and rejecting every mutation.
macro_rules! read_only_indexed_map {
    ($view:ty, [$($generics:tt)*], $($bounds:tt)*) => {
        impl<$($generics)*> IndexedMap<K, R> for $view
        where
            $($bounds)*
        {
            fn count(&self) -> usize {
                <$view>::count(self)
            }

            fn is_read_only(&self) -> bool {
                true
            }

            fn freeze(&mut self) {}

            fn try_get(&self, key: Option<&K>) -> Result<Option<Arc<R>>> {
                <$view>::try_get(self, key)
            }

            fn entries(&self) -> EntryIter<'_, K, R> {
                Box::new(<$view>::iter(self))
            }

            fn add(&mut self, _record: R) -> Result<bool> {
                bail!(IndexedVectorError::NotMutable)
            }

            fn add_or_replace(&mut self, _record: R) -> Result<()> {
                bail!(IndexedVectorError::NotMutable)
            }

            fn remove(&mut self, _key: Option<&K>) -> Result<bool> {
                bail!(IndexedVectorError::NotMutable)
            }

            fn clear(&mut self) -> Result<()> {
                bail!(IndexedVectorError::NotMutable)
            }
        }
    };
}

read_only_indexed_map!(
    GreedyIndexedVector<R, K>,
    [R, K],
    K: Hash + Eq + Clone,
);

read_only_indexed_map!(
    LazyIndexedVector<'a, R, K, C>,
    ['a, R, K, C],
    K: Ord + Clone,
    C: RecordCodec<R>,
);

read_only_indexed_map!(
    ProgressiveIndexedVector<'a, R, K, C>,
    ['a, R, K, C],
    K: Ord + Hash + Clone,
    C: RecordCodec<R>,
);

read_only_indexed_map!(
    ReadOnlyIndexedVector<'a, R, K, C>,
    ['a, R, K, C],
    K: Ord + Hash + Clone,
    C: RecordCodec<R>,
);
