//! # Serialized Vector Layout
//!
//! A sorted indexed vector is written as a fixed header, an end-offset table,
//! and the concatenated element payloads:
//!
//! ```text
//! +------------------+------------------+------------------+
//! | Header (16B)     | End Offsets      | Element Payloads |
//! |                  | [u32; count]     | [u8; payload_len]|
//! +------------------+------------------+------------------+
//!
//! Header Layout:
//!   Bytes 0-3:   Magic "KVEC"
//!   Bytes 4-5:   Version (u16 LE)
//!   Bytes 6-7:   Key slot of the record type (u16 LE)
//!   Bytes 8-11:  Element count (u32 LE)
//!   Bytes 12-15: Payload length in bytes (u32 LE)
//! ```
//!
//! Element `i` occupies `[end[i-1], end[i])` of the payload, with `end[-1] = 0`.
//! Offsets are validated once in [`VectorBuffer::new`], so element access
//! afterwards is O(1) and cannot read outside the buffer.
//!
//! The buffer says nothing about ordering. Elements are sorted ascending by
//! key because the writer sorted them, and nothing here re-checks that.

use eyre::{ensure, Result};
use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::config::{
    MAX_PAYLOAD_LEN, MAX_VECTOR_LEN, OFFSET_ENTRY_SIZE, OFFSET_TABLE_START, VECTOR_HEADER_SIZE,
    VECTOR_MAGIC, VECTOR_VERSION,
};

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct VectorHeader {
    magic: [u8; 4],
    version: U16,
    key_slot: U16,
    count: U32,
    payload_len: U32,
}

const _: () = assert!(std::mem::size_of::<VectorHeader>() == VECTOR_HEADER_SIZE);

impl VectorHeader {
    pub fn new(key_slot: u16, count: usize, payload_len: usize) -> Result<Self> {
        ensure!(
            count <= MAX_VECTOR_LEN,
            "vector too long: {} elements (max {})",
            count,
            MAX_VECTOR_LEN
        );
        ensure!(
            payload_len <= MAX_PAYLOAD_LEN,
            "vector payload too large: {} bytes (max {})",
            payload_len,
            MAX_PAYLOAD_LEN
        );
        Ok(Self {
            magic: *VECTOR_MAGIC,
            version: U16::new(VECTOR_VERSION),
            key_slot: U16::new(key_slot),
            count: U32::new(count as u32),
            payload_len: U32::new(payload_len as u32),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        ensure!(
            bytes.len() >= VECTOR_HEADER_SIZE,
            "buffer too small for vector header: {} < {}",
            bytes.len(),
            VECTOR_HEADER_SIZE
        );

        let header = Self::ref_from_bytes(&bytes[..VECTOR_HEADER_SIZE])
            .map_err(|e| eyre::eyre!("failed to parse vector header: {:?}", e))?;

        ensure!(&header.magic == VECTOR_MAGIC, "invalid magic bytes in vector header");
        ensure!(
            header.version.get() == VECTOR_VERSION,
            "unsupported vector version: {} (expected {})",
            header.version.get(),
            VECTOR_VERSION
        );

        Ok(header)
    }

    zerocopy_getters! {
        version: u16,
        key_slot: u16,
        count: u32,
        payload_len: u32,
    }
}

/// Bounds-checked view over one serialized vector.
#[derive(Debug, Clone, Copy)]
pub struct VectorBuffer<'a> {
    data: &'a [u8],
    len: usize,
    key_slot: u16,
    payload_start: usize,
}

impl<'a> VectorBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let header = VectorHeader::from_bytes(data)?;
        let len = header.count() as usize;
        let payload_len = header.payload_len() as usize;

        let table_len = len
            .checked_mul(OFFSET_ENTRY_SIZE)
            .ok_or_else(|| eyre::eyre!("offset table size overflows for {} elements", len))?;
        let payload_start = OFFSET_TABLE_START + table_len;
        ensure!(
            data.len() >= payload_start,
            "truncated offset table: need {} bytes, have {}",
            payload_start,
            data.len()
        );
        ensure!(
            data.len() - payload_start >= payload_len,
            "truncated payload: need {} bytes, have {}",
            payload_len,
            data.len() - payload_start
        );

        let buffer = Self {
            data,
            len,
            key_slot: header.key_slot(),
            payload_start,
        };

        let mut prev = 0usize;
        for i in 0..len {
            let end = buffer.end_offset(i);
            ensure!(
                end >= prev && end <= payload_len,
                "corrupt offset table: element {} ends at {} (previous {}, payload {})",
                i,
                end,
                prev,
                payload_len
            );
            prev = end;
        }
        ensure!(
            prev == payload_len,
            "offset table covers {} bytes but payload is {} bytes",
            prev,
            payload_len
        );

        Ok(buffer)
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn key_slot(&self) -> u16 {
        self.key_slot
    }

    fn end_offset(&self, index: usize) -> usize {
        let pos = OFFSET_TABLE_START + index * OFFSET_ENTRY_SIZE;
        u32::from_le_bytes([
            self.data[pos],
            self.data[pos + 1],
            self.data[pos + 2],
            self.data[pos + 3],
        ]) as usize
    }

    /// Encoded bytes of element `index`, borrowed from the underlying buffer.
    pub fn element(&self, index: usize) -> Result<&'a [u8]> {
        ensure!(
            index < self.len,
            "element index {} out of bounds for vector of length {}",
            index,
            self.len
        );
        let start = if index == 0 {
            0
        } else {
            self.end_offset(index - 1)
        };
        let end = self.end_offset(index);
        Ok(&self.data[self.payload_start + start..self.payload_start + end])
    }
}

/// Assembles the serialized form from already-encoded elements.
pub(crate) fn assemble_vector<'e>(
    key_slot: u16,
    elements: impl ExactSizeIterator<Item = &'e [u8]>,
) -> Result<Vec<u8>> {
    let count = elements.len();
    let mut offsets = Vec::with_capacity(count * OFFSET_ENTRY_SIZE);
    let mut payload = Vec::new();

    for element in elements {
        payload.extend_from_slice(element);
        ensure!(
            payload.len() <= MAX_PAYLOAD_LEN,
            "vector payload exceeds {} bytes",
            MAX_PAYLOAD_LEN
        );
        offsets.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    }

    let header = VectorHeader::new(key_slot, count, payload.len())?;
    let mut out = Vec::with_capacity(VECTOR_HEADER_SIZE + offsets.len() + payload.len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(&offsets);
    out.extend_from_slice(&payload);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let elements: [&[u8]; 3] = [b"a", b"", b"xyz"];
        assemble_vector(7, elements.into_iter()).unwrap()
    }

    #[test]
    fn header_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<VectorHeader>(), 16);
    }

    #[test]
    fn buffer_exposes_elements_by_index() {
        let data = sample();
        let buffer = VectorBuffer::new(&data).unwrap();

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.key_slot(), 7);
        assert_eq!(buffer.element(0).unwrap(), b"a");
        assert_eq!(buffer.element(1).unwrap(), b"");
        assert_eq!(buffer.element(2).unwrap(), b"xyz");
    }

    #[test]
    fn element_access_is_zero_copy() {
        let data = sample();
        let buffer = VectorBuffer::new(&data).unwrap();
        let element = buffer.element(2).unwrap();
        assert!(data.as_ptr_range().contains(&element.as_ptr()));
    }

    #[test]
    fn element_out_of_bounds_is_an_error() {
        let data = sample();
        let buffer = VectorBuffer::new(&data).unwrap();
        let err = buffer.element(3).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn empty_vector_round_trips() {
        let data = assemble_vector(0, std::iter::empty::<&[u8]>()).unwrap();
        assert_eq!(data.len(), VECTOR_HEADER_SIZE);
        let buffer = VectorBuffer::new(&data).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = sample();
        data[0] = b'X';
        let err = VectorBuffer::new(&data).unwrap_err();
        assert!(err.to_string().contains("magic"));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut data = sample();
        data[4] = 9;
        let err = VectorBuffer::new(&data).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn rejects_truncated_payload() {
        let data = sample();
        let err = VectorBuffer::new(&data[..data.len() - 1]).unwrap_err();
        assert!(err.to_string().contains("truncated payload"));
    }

    #[test]
    fn rejects_decreasing_offsets() {
        let mut data = sample();
        // element 1 claims to end before element 0
        data[OFFSET_TABLE_START + 4..OFFSET_TABLE_START + 8].copy_from_slice(&0u32.to_le_bytes());
        data[OFFSET_TABLE_START..OFFSET_TABLE_START + 4].copy_from_slice(&2u32.to_le_bytes());
        let err = VectorBuffer::new(&data).unwrap_err();
        assert!(err.to_string().contains("corrupt offset table"));
    }

    #[test]
    fn rejects_short_header() {
        let err = VectorBuffer::new(&[0u8; 4]).unwrap_err();
        assert!(err.to_string().contains("too small"));
    }
}
