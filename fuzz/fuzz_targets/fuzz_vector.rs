//! Fuzz testing for the indexed vector lifecycle.
//!
//! Applies arbitrary builder operations alongside a `BTreeMap` model, then
//! writes the frozen vector and checks every deserialization mode against the
//! model.

#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use keyvec::encoding::{FieldReader, FieldWriter};
use keyvec::{
    error_kind, parse_indexed_vector, write_vector, DeserializationMode, FieldCodec,
    FieldRecord, IndexedVector, IndexedVectorError, KeyProjection, SortableRecord,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Item {
    key: Option<String>,
    body: Option<Vec<u8>>,
}

fn item_key(item: &Item) -> Option<&String> {
    item.key.as_ref()
}

impl SortableRecord for Item {
    type Key = String;

    fn key_projection() -> KeyProjection<Self, String> {
        KeyProjection::new(item_key, 1)
    }
}

impl FieldRecord for Item {
    fn write_fields(&self, writer: &mut FieldWriter<'_>) -> eyre::Result<()> {
        writer.put_opt_str(1, self.key.as_deref())?;
        if let Some(body) = &self.body {
            writer.put_bytes(4, body)?;
        }
        Ok(())
    }

    fn read_fields(reader: &FieldReader<'_>) -> eyre::Result<Self> {
        Ok(Item {
            key: reader.str(1)?.map(str::to_string),
            body: reader.bytes(4).map(<[u8]>::to_vec),
        })
    }
}

#[derive(Debug, Arbitrary)]
enum Operation {
    Add(Option<String>, Vec<u8>),
    AddOrReplace(Option<String>, Vec<u8>),
    Remove(Option<String>),
    Lookup(Option<String>),
    Clear,
}

fn assert_null_key<T: std::fmt::Debug>(result: eyre::Result<T>) {
    let err = result.unwrap_err();
    assert_eq!(
        error_kind(&err),
        Some(&IndexedVectorError::InvalidArgument { param: "key" })
    );
}

fuzz_target!(|operations: Vec<Operation>| {
    if operations.len() > 500 {
        return;
    }

    let mut vector = IndexedVector::<Item, String>::new();
    let mut model: BTreeMap<String, Vec<u8>> = BTreeMap::new();

    for op in operations {
        match op {
            Operation::Add(key, body) => {
                let result = vector.add(Item {
                    key: key.clone(),
                    body: Some(body.clone()),
                });
                match key {
                    Some(key) => {
                        let inserted = !model.contains_key(&key);
                        if inserted {
                            model.insert(key, body);
                        }
                        assert_eq!(result.unwrap(), inserted);
                    }
                    None => assert!(result.is_err()),
                }
            }
            Operation::AddOrReplace(key, body) => {
                let result = vector.add_or_replace(Item {
                    key: key.clone(),
                    body: Some(body.clone()),
                });
                match key {
                    Some(key) => {
                        result.unwrap();
                        model.insert(key, body);
                    }
                    None => assert!(result.is_err()),
                }
            }
            Operation::Remove(Some(key)) => {
                let removed = vector.remove(&key).unwrap();
                assert_eq!(removed, model.remove(&key).is_some());
            }
            Operation::Remove(None) => assert_null_key(vector.remove(None)),
            Operation::Lookup(Some(key)) => {
                let found = vector.try_get(&key).unwrap();
                assert_eq!(
                    found.and_then(|item| item.body.clone()).as_ref(),
                    model.get(&key)
                );
            }
            Operation::Lookup(None) => {
                assert_null_key(vector.try_get(None));
                assert_null_key(vector.contains_key(None));
                assert_null_key(vector.get(None));
            }
            Operation::Clear => {
                vector.clear().unwrap();
                model.clear();
            }
        }
        assert_eq!(vector.count(), model.len());
    }

    vector.freeze();
    let bytes = write_vector(&vector, FieldCodec).unwrap();

    for mode in DeserializationMode::ALL {
        let view = parse_indexed_vector(&bytes, mode, Item::key_projection(), FieldCodec).unwrap();
        assert_eq!(view.count(), model.len());

        let entries: Vec<(String, Vec<u8>)> = view
            .iter()
            .map(|entry| {
                let (key, item) = entry.unwrap();
                (key, item.body.clone().unwrap_or_default())
            })
            .collect();
        let expected: Vec<(String, Vec<u8>)> =
            model.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        assert_eq!(entries, expected);

        for (key, body) in &model {
            assert_eq!(view.get(key).unwrap().body.as_ref(), Some(body));
        }
        assert_null_key(view.try_get(None));
        assert_null_key(view.contains_key(None));
    }
});
