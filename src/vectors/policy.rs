//! # Buffer-Backed Vectors
//!
//! Three random-access sequences over the same serialized elements. They share
//! one decode contract, [`RecordVector::get`], and differ only in when decoding
//! happens and whether the result is kept:
//!
//! | Vector | Decodes | Repeated `get(i)` |
//! |--------|---------|-------------------|
//! | [`GreedyVector`] | every element once, at construction | same `Arc` |
//! | [`LazyVector`] | on every call | new `Arc` each time |
//! | [`ProgressiveVector`] | first call per index | same `Arc` |
//!
//! ## Thread Safety
//!
//! `ProgressiveVector` fills its per-index slots through `&self` using
//! `OnceCell`, which makes it `!Sync`. Sharing one across threads needs an
//! outer lock supplied by the caller.

use std::cell::OnceCell;
use std::marker::PhantomData;
use std::sync::Arc;

use eyre::Result;

use super::buffer::VectorBuffer;
use super::codec::RecordCodec;

pub trait RecordVector<R> {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Result<Arc<R>>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Serialized elements plus the codec that decodes them.
#[derive(Debug, Clone)]
pub struct ElementSource<'a, C> {
    buffer: VectorBuffer<'a>,
    codec: C,
}

impl<'a, C> ElementSource<'a, C> {
    pub fn new(buffer: VectorBuffer<'a>, codec: C) -> Self {
        Self { buffer, codec }
    }

    pub fn buffer(&self) -> &VectorBuffer<'a> {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn decode<R>(&self, index: usize) -> Result<R>
    where
        C: RecordCodec<R>,
    {
        let bytes = self.buffer.element(index)?;
        self.codec
            .decode(bytes)
            .map_err(|e| e.wrap_err(format!("failed to decode element {}", index)))
    }
}

#[derive(Debug, Clone)]
pub struct GreedyVector<R> {
    items: Vec<Arc<R>>,
}

impl<R> GreedyVector<R> {
    pub fn decode_all<C: RecordCodec<R>>(source: &ElementSource<'_, C>) -> Result<Self> {
        let items = (0..source.len())
            .map(|i| source.decode::<R>(i).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(len = items.len(), "materialized greedy vector");
        Ok(Self { items })
    }

    pub fn items(&self) -> &[Arc<R>] {
        &self.items
    }
}

impl<R> RecordVector<R> for GreedyVector<R> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Result<Arc<R>> {
        self.items.get(index).cloned().ok_or_else(|| {
            eyre::eyre!(
                "element index {} out of bounds for vector of length {}",
                index,
                self.items.len()
            )
        })
    }
}

pub struct LazyVector<'a, R, C> {
    source: ElementSource<'a, C>,
    _record: PhantomData<fn() -> R>,
}

impl<'a, R, C: RecordCodec<R>> LazyVector<'a, R, C> {
    pub fn new(source: ElementSource<'a, C>) -> Self {
        Self {
            source,
            _record: PhantomData,
        }
    }
}

impl<R, C: RecordCodec<R>> RecordVector<R> for LazyVector<'_, R, C> {
    fn len(&self) -> usize {
        self.source.len()
    }

    fn get(&self, index: usize) -> Result<Arc<R>> {
        self.source.decode::<R>(index).map(Arc::new)
    }
}

pub struct ProgressiveVector<'a, R, C> {
    source: ElementSource<'a, C>,
    slots: Box<[OnceCell<Arc<R>>]>,
}

impl<'a, R, C: RecordCodec<R>> ProgressiveVector<'a, R, C> {
    pub fn new(source: ElementSource<'a, C>) -> Self {
        let slots = (0..source.len()).map(|_| OnceCell::new()).collect();
        Self { source, slots }
    }

    /// Number of indices decoded so far.
    pub fn decoded_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }
}

impl<R, C: RecordCodec<R>> RecordVector<R> for ProgressiveVector<'_, R, C> {
    fn len(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, index: usize) -> Result<Arc<R>> {
        let slot = self.slots.get(index).ok_or_else(|| {
            eyre::eyre!(
                "element index {} out of bounds for vector of length {}",
                index,
                self.slots.len()
            )
        })?;

        if let Some(record) = slot.get() {
            return Ok(Arc::clone(record));
        }

        let record = Arc::new(self.source.decode::<R>(index)?);
        tracing::trace!(index, "progressive vector decoded element");
        Ok(Arc::clone(slot.get_or_init(|| record)))
    }
}
