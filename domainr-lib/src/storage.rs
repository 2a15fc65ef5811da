//! Persistent key/bytes storage underneath the availability cache.
//!
//! Storage knows nothing about expiry; it only reads and writes opaque
//! records. A missing key is reported as [`DomainrError::CacheMiss`], any
//! other failure as [`DomainrError::CacheStorage`].

use crate::error::DomainrError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// A persistent key to bytes store.
///
/// Implementations must tolerate concurrent calls. Two writes to the same key
/// may race; one of them wins intact.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the record stored under `key`.
    async fn read(&self, key: &str) -> Result<Vec<u8>, DomainrError>;

    /// Replace the record stored under `key`.
    async fn write(&self, key: &str, data: &[u8]) -> Result<(), DomainrError>;
}

/// Flat directory with one file per key.
#[derive(Debug)]
pub struct DiskStorage {
    dir: PathBuf,
    write_seq: AtomicU64,
}

impl DiskStorage {
    /// Open storage rooted at `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, DomainrError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            DomainrError::cache_storage(dir.display().to_string(), e.to_string())
        })?;

        Ok(Self {
            dir,
            write_seq: AtomicU64::new(0),
        })
    }

    /// Directory the records live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(escape_key(key))
    }
}

#[async_trait]
impl Storage for DiskStorage {
    async fn read(&self, key: &str) -> Result<Vec<u8>, DomainrError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(DomainrError::cache_miss(key)),
            Err(e) => Err(DomainrError::cache_storage(key, e.to_string())),
        }
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<(), DomainrError> {
        let target = self.path_for(key);

        // Write beside the target and rename so readers never see a torn record.
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let tmp = self.dir.join(format!(
            ".{}.{}.{}.tmp",
            escape_key(key),
            std::process::id(),
            seq
        ));

        if let Err(e) = tokio::fs::write(&tmp, data).await {
            return Err(DomainrError::cache_storage(key, e.to_string()));
        }

        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(DomainrError::cache_storage(key, e.to_string()));
        }

        Ok(())
    }
}

/// In-process storage, used in tests and for runs without a disk cache.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired or not.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Vec<u8>, DomainrError> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainrError::cache_storage(key, "storage lock poisoned"))?;
        records
            .get(key)
            .cloned()
            .ok_or_else(|| DomainrError::cache_miss(key))
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<(), DomainrError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainrError::cache_storage(key, "storage lock poisoned"))?;
        records.insert(key.to_string(), data.to_vec());
        Ok(())
    }
}

/// Map an arbitrary key onto a single safe file name.
///
/// ASCII letters, digits, `-` and `_` pass through, as does `.` anywhere but
/// the first position. Every other byte becomes `%XX`.
fn escape_key(key: &str) -> String {
    if key.is_empty() {
        return "%".to_string();
    }

    let mut escaped = String::with_capacity(key.len());
    for (i, byte) in key.bytes().enumerate() {
        let plain = byte.is_ascii_alphanumeric()
            || byte == b'-'
            || byte == b'_'
            || (byte == b'.' && i > 0);
        if plain {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("%{:02X}", byte));
        }
    }
    escaped
}
