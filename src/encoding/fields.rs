//! # Slot-Tagged Record Fields
//!
//! A record element inside a serialized vector is a sequence of optional
//! fields, each tagged with the slot number the schema assigned to it. Absent
//! fields are simply not written, so a record whose key field was never set
//! decodes with that field missing.
//!
//! ```text
//! +-------------+-------------+---------------+-------------+-----
//! | slot varint | len varint  | payload [len] | slot varint | ...
//! +-------------+-------------+---------------+-------------+-----
//! ```
//!
//! Slots must be written in strictly ascending order; the reader rejects
//! anything else so a single forward scan can answer every lookup.
//!
//! ## Usage
//!
//! ```ignore
//! let mut writer = FieldWriter::new(&mut out);
//! writer.put_str(0, "alice")?;
//! writer.put_i64(1, 42)?;
//!
//! let reader = FieldReader::new(&out)?;
//! assert_eq!(reader.str(0)?, Some("alice"));
//! ```

use eyre::{ensure, Result};
use smallvec::SmallVec;

use super::varint::{put_varint, read_varint};
use crate::config::{MAX_FIELD_LEN, MAX_FIELD_SLOT};

pub struct FieldWriter<'a> {
    out: &'a mut Vec<u8>,
    last_slot: Option<u16>,
}

impl<'a> FieldWriter<'a> {
    pub fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            out,
            last_slot: None,
        }
    }

    pub fn put_bytes(&mut self, slot: u16, payload: &[u8]) -> Result<()> {
        ensure!(slot <= MAX_FIELD_SLOT, "field slot {} out of range", slot);
        ensure!(
            self.last_slot.map_or(true, |last| slot > last),
            "field slot {} written out of order (previous {:?})",
            slot,
            self.last_slot
        );
        ensure!(
            payload.len() <= MAX_FIELD_LEN,
            "field {} payload too large: {} bytes",
            slot,
            payload.len()
        );

        put_varint(slot as u64, self.out);
        put_varint(payload.len() as u64, self.out);
        self.out.extend_from_slice(payload);
        self.last_slot = Some(slot);
        Ok(())
    }

    pub fn put_str(&mut self, slot: u16, value: &str) -> Result<()> {
        self.put_bytes(slot, value.as_bytes())
    }

    pub fn put_i32(&mut self, slot: u16, value: i32) -> Result<()> {
        self.put_bytes(slot, &value.to_le_bytes())
    }

    pub fn put_i64(&mut self, slot: u16, value: i64) -> Result<()> {
        self.put_bytes(slot, &value.to_le_bytes())
    }

    /// Writes `value` only when it is present.
    pub fn put_opt_str(&mut self, slot: u16, value: Option<&str>) -> Result<()> {
        match value {
            Some(v) => self.put_str(slot, v),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    fields: SmallVec<[(u16, &'a [u8]); 8]>,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let mut fields = SmallVec::new();
        let mut pos = 0usize;
        let mut last_slot: Option<u16> = None;

        while pos < data.len() {
            let (slot, n) = read_varint(&data[pos..])?;
            pos += n;
            ensure!(
                slot <= MAX_FIELD_SLOT as u64,
                "field slot {} out of range",
                slot
            );
            let slot = slot as u16;
            ensure!(
                last_slot.map_or(true, |last| slot > last),
                "field slot {} out of order",
                slot
            );

            let (len, n) = read_varint(&data[pos..])?;
            pos += n;
            let len = len as usize;
            ensure!(len <= MAX_FIELD_LEN, "field {} length {} too large", slot, len);
            ensure!(
                data.len() - pos >= len,
                "field {} truncated: need {} bytes, have {}",
                slot,
                len,
                data.len() - pos
            );

            fields.push((slot, &data[pos..pos + len]));
            pos += len;
            last_slot = Some(slot);
        }

        Ok(Self { fields })
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn bytes(&self, slot: u16) -> Option<&'a [u8]> {
        self.fields
            .binary_search_by_key(&slot, |(s, _)| *s)
            .ok()
            .map(|idx| self.fields[idx].1)
    }

    pub fn str(&self, slot: u16) -> Result<Option<&'a str>> {
        self.bytes(slot)
            .map(|b| {
                std::str::from_utf8(b)
                    .map_err(|e| eyre::eyre!("invalid UTF-8 in field {}: {}", slot, e))
            })
            .transpose()
    }

    pub fn i32(&self, slot: u16) -> Result<Option<i32>> {
        self.bytes(slot)
            .map(|b| {
                let bytes: [u8; 4] = b
                    .try_into()
                    .map_err(|_| eyre::eyre!("field {} is {} bytes, expected 4", slot, b.len()))?;
                Ok(i32::from_le_bytes(bytes))
            })
            .transpose()
    }

    pub fn i64(&self, slot: u16) -> Result<Option<i64>> {
        self.bytes(slot)
            .map(|b| {
                let bytes: [u8; 8] = b
                    .try_into()
                    .map_err(|_| eyre::eyre!("field {} is {} bytes, expected 8", slot, b.len()))?;
                Ok(i64::from_le_bytes(bytes))
            })
            .transpose()
    }
}
