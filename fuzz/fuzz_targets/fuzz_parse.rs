//! Fuzz testing for parsing untrusted vector bytes.
//!
//! Feeds raw input to `VectorBuffer` and every deserialization mode. Parsing
//! and lookups may fail but must never panic or read out of bounds.

#![no_main]

use libfuzzer_sys::fuzz_target;

use keyvec::encoding::{FieldReader, FieldWriter};
use keyvec::vectors::VectorBuffer;
use keyvec::{parse_indexed_vector, DeserializationMode, FieldCodec, FieldRecord, KeyProjection};

struct Entry {
    id: Option<i64>,
}

fn entry_id(entry: &Entry) -> Option<&i64> {
    entry.id.as_ref()
}

const ENTRY_KEY: KeyProjection<Entry, i64> = KeyProjection::new(entry_id, 0);

impl FieldRecord for Entry {
    fn write_fields(&self, writer: &mut FieldWriter<'_>) -> eyre::Result<()> {
        match self.id {
            Some(id) => writer.put_i64(0, id),
            None => Ok(()),
        }
    }

    fn read_fields(reader: &FieldReader<'_>) -> eyre::Result<Self> {
        Ok(Entry { id: reader.i64(0)? })
    }
}

fuzz_target!(|data: &[u8]| {
    if let Ok(buffer) = VectorBuffer::new(data) {
        for i in 0..buffer.len().min(64) {
            let element = buffer.element(i).unwrap();
            let _ = FieldReader::new(element);
        }
        assert!(buffer.element(buffer.len()).is_err());
    }

    for mode in DeserializationMode::ALL {
        let Ok(view) = parse_indexed_vector(data, mode, ENTRY_KEY, FieldCodec) else {
            continue;
        };
        for probe in [i64::MIN, -1, 0, 1, i64::MAX] {
            let _ = view.try_get(&probe);
        }
        for entry in view.iter().take(64) {
            let _ = entry;
        }
    }
});
