use crate::error::CacheError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs;

/// Key-value blob storage backing the address cache
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read a record. A record that was never written is `Ok(None)`.
    async fn read(&self, record: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Replace a record. Readers see either the old or the new bytes.
    async fn write(&self, record: &str, bytes: Vec<u8>) -> Result<(), CacheError>;
}

pub type SharedBlobStore = Arc<dyn BlobStore>;

/// One file per record inside a directory
#[derive(Clone, Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, record: &str) -> PathBuf {
        self.dir.join(record)
    }

    /// Temporary sibling for a write in progress. Its name does not include
    /// the record name, so any record name that fits the filesystem also
    /// fits here.
    fn temp_path(&self) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(".{}.{}.tmp", process::id(), n))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn read(&self, record: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(self.path(record)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::io(record, e)),
        }
    }

    async fn write(&self, record: &str, bytes: Vec<u8>) -> Result<(), CacheError> {
        // create_dir_all succeeds when the directory already exists
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CacheError::io(record, e))?;

        let temp = self.temp_path();
        if let Err(e) = fs::write(&temp, &bytes).await {
            let _ = fs::remove_file(&temp).await;
            return Err(CacheError::io(record, e));
        }
        if let Err(e) = fs::rename(&temp, self.path(record)).await {
            let _ = fs::remove_file(&temp).await;
            return Err(CacheError::io(record, e));
        }

        Ok(())
    }
}

/// In-memory store
#[derive(Clone, Debug, Default)]
pub struct MemoryBlobStore {
    records: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn read(&self, record: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.records.get(record).map(|entry| entry.value().clone()))
    }

    async fn write(&self, record: &str, bytes: Vec<u8>) -> Result<(), CacheError> {
        self.records.insert(record.to_string(), bytes);
        Ok(())
    }
}
