//! # keyvec Configuration Constants
//!
//! This module centralizes the constants that describe the serialized vector
//! layout. The reader and the writer both import from here so the two sides
//! can never disagree about header size or offset width.
//!
//! ## Dependency Graph
//!
//! ```text
//! VECTOR_HEADER_SIZE (16 bytes)
//!       │
//!       └─> OFFSET_TABLE_START (== VECTOR_HEADER_SIZE)
//!             The end-offset table begins right after the header.
//!
//! OFFSET_ENTRY_SIZE (4 bytes, u32 LE)
//!       │
//!       ├─> MAX_VECTOR_LEN (bounded by u32 count field)
//!       │
//!       └─> MAX_PAYLOAD_LEN (bounded by u32 end offsets)
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `VECTOR_HEADER_SIZE` matches `size_of::<VectorHeader>()` (asserted in
//!    `vectors::buffer`)
//! 2. `OFFSET_ENTRY_SIZE == size_of::<u32>()`
//! 3. `MAX_VECTOR_LEN` and `MAX_PAYLOAD_LEN` fit in the u32 wire fields

/// Magic bytes at the start of every serialized indexed vector.
pub const VECTOR_MAGIC: &[u8; 4] = b"KVEC";

/// Current wire version. Readers reject any other value.
pub const VECTOR_VERSION: u16 = 1;

/// Size of the fixed vector header in bytes.
pub const VECTOR_HEADER_SIZE: usize = 16;

/// Width of one entry in the end-offset table.
pub const OFFSET_ENTRY_SIZE: usize = 4;

/// Byte position of the offset table within a serialized vector.
pub const OFFSET_TABLE_START: usize = VECTOR_HEADER_SIZE;

/// Maximum number of elements a serialized vector can hold.
pub const MAX_VECTOR_LEN: usize = u32::MAX as usize;

/// Maximum size of the concatenated element payload.
pub const MAX_PAYLOAD_LEN: usize = u32::MAX as usize;

const _: () = assert!(
    OFFSET_ENTRY_SIZE == std::mem::size_of::<u32>(),
    "offset table entries are u32"
);

const _: () = assert!(
    OFFSET_TABLE_START == VECTOR_HEADER_SIZE,
    "offset table must follow the header directly"
);

// ============================================================================
// FIELD ENCODING
// ============================================================================

/// Largest slot number a record field may use.
pub const MAX_FIELD_SLOT: u16 = u16::MAX - 1;

/// Largest single field payload accepted by `FieldReader`.
pub const MAX_FIELD_LEN: usize = 16 * 1024 * 1024;
