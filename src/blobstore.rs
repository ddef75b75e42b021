//! Blob storage for raw uploaded document bytes.
//!
//! Uploads are written once at upload time and read back by the processing
//! pipeline. The filesystem implementation keeps each upload as a single
//! file under a configured directory; keys are flat names, never paths.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by blob store implementations.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// No blob exists for the requested key.
    #[error("Blob not found: {0}")]
    NotFound(String),
    /// Key contained characters the backend refuses to store under.
    #[error("Invalid blob key: {0}")]
    InvalidKey(String),
    /// Underlying I/O failure.
    #[error("Blob store I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Narrow byte-storage interface used by upload and processing.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`, overwriting any previous blob.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobStoreError>;

    /// Retrieve the bytes stored under `key`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobStoreError>;
}

/// Filesystem-backed blob store rooted at a single directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create the store, ensuring the root directory exists.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, BlobStoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, BlobStoreError> {
        // Keys are flat file names; anything that could traverse out of the
        // root is rejected.
        if key.is_empty()
            || key.contains('/')
            || key.contains('\\')
            || key.contains("..")
            || key.contains('\0')
        {
            return Err(BlobStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    /// Root directory blobs are stored under.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobStoreError> {
        let path = self.resolve(key)?;
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(key, bytes = bytes.len(), "Stored blob");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobStoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobStoreError::NotFound(key.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
