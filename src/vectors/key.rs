//! # Key Projection
//!
//! Every record type that can live in an indexed vector has exactly one key
//! field. A [`KeyProjection`] pairs the accessor for that field with the wire
//! slot it occupies, and is handed to builders and views when they are
//! constructed. There is no global registry: a vector can only touch records
//! through the projection it was built with.
//!
//! Key fields are optional on the wire, so the accessor returns `Option<&K>`.
//! A record whose accessor yields `None` carries a null key.
//!
//! ## Null Lookup Keys
//!
//! Lookup and removal entry points accept anything implementing
//! [`LookupKey`]: a plain `&K`, or an `Option<&K>` where `None` stands for a
//! null key and is rejected with `InvalidArgument` before any comparison.
//!
//! ```ignore
//! view.try_get(&key)?;          // always a real key
//! view.try_get(None)?;          // fails: InvalidArgument
//! ```

use std::fmt;
use std::hash::Hash;

use eyre::{bail, Result};

use crate::error::IndexedVectorError;

pub struct KeyProjection<R, K> {
    accessor: fn(&R) -> Option<&K>,
    slot: u16,
}

impl<R, K> KeyProjection<R, K> {
    pub const fn new(accessor: fn(&R) -> Option<&K>, slot: u16) -> Self {
        Self { accessor, slot }
    }

    /// Wire slot of the key field within an encoded record.
    pub fn slot(&self) -> u16 {
        self.slot
    }

    pub fn key_of<'r>(&self, record: &'r R) -> Option<&'r K> {
        (self.accessor)(record)
    }

    /// Key of a record handed in by the caller; a missing key is a null argument.
    pub(crate) fn require_key<'r>(&self, record: &'r R) -> Result<&'r K> {
        match self.key_of(record) {
            Some(key) => Ok(key),
            None => bail!(IndexedVectorError::InvalidArgument { param: "record.key" }),
        }
    }

    /// Key of a record decoded from a buffer; a missing key means the writer
    /// produced something this layer cannot search.
    pub(crate) fn stored_key<'r>(&self, record: &'r R, index: usize) -> Result<&'r K> {
        match self.key_of(record) {
            Some(key) => Ok(key),
            None => bail!(
                "element {} has no key in slot {}; sorted vectors require a key on every element",
                index,
                self.slot
            ),
        }
    }
}

impl<R, K> Clone for KeyProjection<R, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, K> Copy for KeyProjection<R, K> {}

impl<R, K> fmt::Debug for KeyProjection<R, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyProjection")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

/// A record type with one designated, comparable key field.
pub trait SortableRecord: Sized {
    type Key: Ord + Hash + Clone + fmt::Debug;

    fn key_projection() -> KeyProjection<Self, Self::Key>;
}

/// A key argument that may be null.
pub trait LookupKey<K> {
    fn lookup_key(&self) -> Option<&K>;
}

impl<K> LookupKey<K> for &K {
    fn lookup_key(&self) -> Option<&K> {
        Some(*self)
    }
}

impl<K> LookupKey<K> for Option<&K> {
    fn lookup_key(&self) -> Option<&K> {
        *self
    }
}

pub(crate) fn require_lookup_key<K, Q: LookupKey<K>>(key: &Q) -> Result<&K> {
    match key.lookup_key() {
        Some(key) => Ok(key),
        None => bail!(IndexedVectorError::InvalidArgument { param: "key" }),
    }
}
