//! # Indexed Vectors
//!
//! Key-indexed access over vectors of records sorted by one designated key
//! field. A vector is assembled with the mutable [`IndexedVector`] builder,
//! frozen, serialized with [`write_vector`], and later opened as one of three
//! read-only views with [`parse_indexed_vector`].
//!
//! ## Data Flow
//!
//! ```text
//!  IndexedVector ──freeze──> write_vector ──> bytes
//!   (insertion order)        (sorts by key)     │
//!                                               ▼
//!                                    parse_indexed_vector(mode)
//!                                               │
//!              ┌────────────────────────────────┼────────────────────────────┐
//!              ▼                                ▼                            ▼
//!   GreedyIndexedVector              LazyIndexedVector        ProgressiveIndexedVector
//!   decode all, hash index           binary search per call   binary search + key cache
//! ```
//!
//! ## Module Layout
//!
//! - `key`: key projections and nullable lookup keys
//! - `buffer`: serialized vector header and offset table
//! - `codec`: element encode/decode
//! - `policy`: greedy, lazy and progressive buffer-backed vectors
//! - `search`: binary search over a sorted vector
//! - `builder`: the mutable builder
//! - `writer`: builder serialization
//! - `view`: the read-only views and parse-time dispatch
//! - `map`: the [`IndexedMap`] trait shared by builder and views

pub mod buffer;
pub mod builder;
pub mod codec;
pub mod key;
pub mod map;
pub mod policy;
pub mod search;
pub mod view;
pub mod writer;


pub use buffer::{VectorBuffer, VectorHeader};
pub use builder::IndexedVector;
pub use codec::{FieldCodec, FieldRecord, RecordCodec};
pub use key::{KeyProjection, LookupKey, SortableRecord};
pub use map::{EntryIter, IndexedMap};
pub use policy::{ElementSource, GreedyVector, LazyVector, ProgressiveVector, RecordVector};
pub use search::{search_index, search_sorted};
pub use view::{
    parse_indexed_vector, Entries, GreedyIndexedVector, LazyIndexedVector,
    ProgressiveIndexedVector, ReadOnlyIndexedVector, Resolution,
};
pub use writer::write_vector;
