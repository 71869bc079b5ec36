//! # keyvec - Key-Indexed Sorted Vectors
//!
//! keyvec gives dictionary-style access to vectors of records that are kept
//! sorted by one designated key field. Records are collected in a mutable
//! builder, serialized once in key order, and read back through a view that
//! answers key lookups without the writer having stored any index.
//!
//! ## Quick Start
//!
//! ```ignore
//! use keyvec::{parse_indexed_vector, write_vector, DeserializationMode, FieldCodec};
//! use keyvec::{IndexedVector, SortableRecord};
//!
//! let mut members = IndexedVector::<Member, String>::new();
//! members.add(Member::new("bob", "builder"))?;
//! members.add(Member::new("alice", "admin"))?;
//! members.freeze();
//!
//! let bytes = write_vector(&members, FieldCodec)?;
//! let view = parse_indexed_vector(
//!     &bytes,
//!     DeserializationMode::Progressive,
//!     Member::key_projection(),
//!     FieldCodec,
//! )?;
//! assert!(view.contains_key(&"alice".to_string())?);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  IndexedVector (builder) │ IndexedMap trait  │
//! ├─────────────────────────────────────────────┤
//! │  Greedy / Lazy / Progressive read-only views │
//! ├─────────────────────────────────────────────┤
//! │  Sorted search │ Buffer-backed vectors       │
//! ├─────────────────────────────────────────────┤
//! │  VectorBuffer header + offsets │ RecordCodec │
//! ├─────────────────────────────────────────────┤
//! │  Slot-tagged fields │ Varints                │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Deserialization Modes
//!
//! - **Greedy**: decode every element at parse time and build a hash index
//! - **Lazy**: keep only the buffer; every lookup binary searches and decodes
//! - **Progressive**: binary search on first lookup, then remember the answer
//!
//! ## Module Overview
//!
//! - [`config`]: format constants and [`DeserializationMode`]
//! - [`encoding`]: varints and slot-tagged record fields
//! - [`error`]: the typed contract errors carried inside `eyre` reports
//! - [`vectors`]: builder, writer, views and the search they share

#[macro_use]
mod macros;

pub mod config;
pub mod encoding;
pub mod error;
pub mod vectors;

pub use config::DeserializationMode;
pub use error::{error_kind, IndexedVectorError};
pub use vectors::{
    parse_indexed_vector, write_vector, FieldCodec, FieldRecord, GreedyIndexedVector,
    IndexedMap, IndexedVector, KeyProjection, LazyIndexedVector, LookupKey,
    ProgressiveIndexedVector, ReadOnlyIndexedVector, RecordCodec, Resolution, SortableRecord,
};
