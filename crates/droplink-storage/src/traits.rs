use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("read failed: {0}")]
    ReadFailed(String),

    #[error("delete failed: {0}")]
    DeleteFailed(String),

    #[error("blob not found: {0}")]
    NotFound(String),

    #[error("invalid storage name: {0}")]
    InvalidKey(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked blob contents, suitable for an HTTP response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// Receipt for a persisted blob.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// Server-assigned name; the only handle ever used to address the blob.
    pub storage_name: String,
    pub size_bytes: u64,
}

/// Blob store abstraction.
///
/// Writes are durable before `put` returns. `delete` is idempotent: deleting
/// an absent blob is a no-op, which is what lets the reaper and a
/// lookup-triggered lazy delete race on the same group safely.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist `data` under a freshly derived storage name.
    async fn put(&self, original_name: &str, data: Bytes) -> StorageResult<StoredBlob>;

    /// Open a blob for chunked reading.
    async fn get(&self, storage_name: &str) -> StorageResult<ByteStream>;

    /// Remove a blob. Absent blobs are `Ok(())`.
    async fn delete(&self, storage_name: &str) -> StorageResult<()>;

    /// Whether a blob currently exists.
    async fn exists(&self, storage_name: &str) -> StorageResult<bool>;
}
