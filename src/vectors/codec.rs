//! # Element Codecs
//!
//! A [`RecordCodec`] turns one record into the bytes of one vector element and
//! back. The vectors in this crate never look inside element bytes themselves;
//! decode cost, and whether decoding borrows or copies, is the codec's concern.
//!
//! [`FieldCodec`] is the codec for record types described with slot-tagged
//! fields (see [`crate::encoding::fields`]).

use eyre::Result;

use crate::encoding::{FieldReader, FieldWriter};

pub trait RecordCodec<R> {
    fn encode(&self, record: &R, out: &mut Vec<u8>) -> Result<()>;

    fn decode(&self, bytes: &[u8]) -> Result<R>;
}

impl<R, C: RecordCodec<R> + ?Sized> RecordCodec<R> for &C {
    fn encode(&self, record: &R, out: &mut Vec<u8>) -> Result<()> {
        (**self).encode(record, out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<R> {
        (**self).decode(bytes)
    }
}

/// A record stored as slot-tagged fields.
pub trait FieldRecord: Sized {
    fn write_fields(&self, writer: &mut FieldWriter<'_>) -> Result<()>;

    fn read_fields(reader: &FieldReader<'_>) -> Result<Self>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldCodec;

impl<R: FieldRecord> RecordCodec<R> for FieldCodec {
    fn encode(&self, record: &R, out: &mut Vec<u8>) -> Result<()> {
        record.write_fields(&mut FieldWriter::new(out))
    }

    fn decode(&self, bytes: &[u8]) -> Result<R> {
        R::read_fields(&FieldReader::new(bytes)?)
    }
}
