//! # Encoding Module
//!
//! Byte-level helpers for the element payloads stored inside a serialized
//! indexed vector:
//!
//! - **Varint encoding**: Marker-byte lengths and slot numbers
//! - **Field encoding**: Slot-tagged optional fields making up one record

pub mod fields;
pub mod varint;

pub use fields::{FieldReader, FieldWriter};
pub use varint::{put_varint, read_varint, varint_len};
