//! # Vector Writer
//!
//! Serializes a frozen [`IndexedVector`] into the layout described in
//! [`super::buffer`]. This is the one place entries are put into key order:
//! the builder keeps insertion order, and binary search on the read side
//! depends on the writer having sorted ascending by key.
//!
//! Writing borrows the builder and never changes it. An unfrozen builder is
//! rejected so the lifecycle stays `mutable -> frozen -> serialized`.

use std::hash::Hash;

use eyre::{ensure, Result};

use super::buffer::assemble_vector;
use super::builder::IndexedVector;
use super::codec::RecordCodec;

pub fn write_vector<R, K, C>(vector: &IndexedVector<R, K>, codec: C) -> Result<Vec<u8>>
where
    K: Ord + Hash + Clone,
    C: RecordCodec<R>,
{
    ensure!(
        vector.is_read_only(),
        "indexed vector must be frozen before it is written"
    );

    let mut sorted: Vec<_> = vector.iter().collect();
    sorted.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut encoded = Vec::with_capacity(sorted.len());
    for (_, record) in &sorted {
        let mut bytes = Vec::new();
        codec.encode(record, &mut bytes)?;
        encoded.push(bytes);
    }

    let out = assemble_vector(
        vector.projection().slot(),
        encoded.iter().map(Vec::as_slice),
    )?;
    tracing::debug!(
        count = sorted.len(),
        bytes = out.len(),
        key_slot = vector.projection().slot(),
        "wrote indexed vector"
    );
    Ok(out)
}
