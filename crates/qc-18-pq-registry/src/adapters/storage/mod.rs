//! Storage Adapters
//!
//! Implementations of the `KeyValueStore` trait.

mod file;
mod memory;

pub use file::FileBackedKVStore;
pub use memory::InMemoryKVStore;

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::BatchOperation;
use std::collections::{BTreeMap, BTreeSet};

pub(crate) type Table = BTreeMap<Vec<u8>, Vec<u8>>;

/// Check every operation against `table` and the operations before it,
/// then apply them. Nothing is written if any check fails.
pub(crate) fn apply_checked(
    table: &mut Table,
    operations: Vec<BatchOperation>,
) -> Result<(), KVStoreError> {
    let mut written: BTreeSet<&[u8]> = BTreeSet::new();
    for op in &operations {
        let present = written.contains(op.key()) || table.contains_key(op.key());
        match op {
            BatchOperation::Insert { key, .. } if present => {
                return Err(KVStoreError::KeyExists {
                    key: hex::encode(key),
                });
            }
            BatchOperation::Update { key, .. } if !present => {
                return Err(KVStoreError::KeyMissing {
                    key: hex::encode(key),
                });
            }
            _ => {}
        }
        written.insert(op.key());
    }

    for op in operations {
        match op {
            BatchOperation::Insert { key, value } | BatchOperation::Update { key, value } => {
                table.insert(key, value);
            }
        }
    }
    Ok(())
}
