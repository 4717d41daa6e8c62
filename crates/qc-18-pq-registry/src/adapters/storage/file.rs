use super::{apply_checked, Table};
use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed key-value store.
///
/// Holds the whole table in memory and rewrites a single binary file on
/// every write, via temp file + rename. A batch is applied to a copy of the
/// table and only swapped in once the file is durable.
///
/// File format: `[key_len:u32 LE][key][value_len:u32 LE][value]...`
pub struct FileBackedKVStore {
    data: Table,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open the store at `path`, creating an empty one if the file is absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let bytes = std::fs::read(&path).map_err(io_error)?;
            let data = decode_table(&bytes)?;
            info!(
                "[qc-18] 💾 Loaded {} keys from {} ({} bytes)",
                data.len(),
                path.display(),
                bytes.len()
            );
            data
        } else {
            info!("[qc-18] 📁 No existing registry file at {}", path.display());
            Table::new()
        };

        Ok(Self { data, path })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, data: &Table) -> Result<(), KVStoreError> {
        use std::io::Write;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_error)?;
            }
        }

        let bytes = encode_table(data);

        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_error)?;

        debug!("[qc-18] wrote {} keys to {}", data.len(), self.path.display());
        Ok(())
    }

    fn commit(&mut self, next: Table) -> Result<(), KVStoreError> {
        self.save(&next)?;
        self.data = next;
        Ok(())
    }
}

fn io_error(e: std::io::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: e.to_string(),
    }
}

fn corruption(offset: usize) -> KVStoreError {
    KVStoreError::CorruptionError {
        message: format!("truncated record at offset {offset}"),
    }
}

fn encode_table(data: &Table) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (key, value) in data {
        bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
        bytes.extend_from_slice(key);
        bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
        bytes.extend_from_slice(value);
    }
    bytes
}

fn read_chunk<'a>(bytes: &'a [u8], cursor: &mut usize) -> Result<&'a [u8], KVStoreError> {
    let start = *cursor;
    let len_bytes: [u8; 4] = bytes
        .get(start..start + 4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| corruption(start))?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    let body = bytes
        .get(start + 4..start + 4 + len)
        .ok_or_else(|| corruption(start))?;
    *cursor = start + 4 + len;
    Ok(body)
}

fn decode_table(bytes: &[u8]) -> Result<Table, KVStoreError> {
    let mut data = Table::new();
    let mut cursor = 0;
    while cursor < bytes.len() {
        let key = read_chunk(bytes, &mut cursor)?.to_vec();
        let value = read_chunk(bytes, &mut cursor)?.to_vec();
        data.insert(key, value);
    }
    Ok(data)
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut next = self.data.clone();
        apply_checked(&mut next, operations)?;
        self.commit(next)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }
}
