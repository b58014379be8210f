use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::keys::storage_name_for;
use crate::traits::{ByteStream, Storage, StorageError, StorageResult, StoredBlob};

/// Local filesystem blob store. All blobs live flat under `base_path`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create the store, creating `base_path` if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;
        Ok(LocalStorage { base_path })
    }

    /// Convert a storage name to a filesystem path, rejecting anything that
    /// could resolve outside the base directory. Storage names are generated
    /// by `storage_name_for` and contain no separators; anything else is a
    /// forged handle.
    fn name_to_path(&self, storage_name: &str) -> StorageResult<PathBuf> {
        if storage_name.is_empty()
            || storage_name.contains("..")
            || storage_name.contains('/')
            || storage_name.contains('\\')
            || storage_name.starts_with('.')
        {
            return Err(StorageError::InvalidKey(
                "storage name contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(storage_name))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, original_name: &str, data: Bytes) -> StorageResult<StoredBlob> {
        let storage_name = storage_name_for(original_name);
        let path = self.name_to_path(&storage_name)?;
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("failed to create {}: {}", path.display(), e))
        })?;
        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("failed to write {}: {}", path.display(), e))
        })?;
        // Durable before the upload is acknowledged.
        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("failed to sync {}: {}", path.display(), e))
        })?;

        tracing::info!(
            storage_name = %storage_name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "blob stored"
        );

        Ok(StoredBlob {
            storage_name,
            size_bytes: size,
        })
    }

    async fn get(&self, storage_name: &str) -> StorageResult<ByteStream> {
        let path = self.name_to_path(storage_name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_name.to_string()));
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("failed to open {}: {}", path.display(), e))
        })?;

        let name = storage_name.to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |chunk| {
            chunk.map_err(|e| {
                tracing::error!(storage_name = %name, error = %e, "blob read error mid-stream");
                StorageError::ReadFailed(format!("failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    async fn delete(&self, storage_name: &str) -> StorageResult<()> {
        let path = self.name_to_path(storage_name)?;

        // Idempotent: an already-absent blob means the other deleter won.
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(storage_name = %storage_name, "blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, storage_name: &str) -> StorageResult<bool> {
        let path = self.name_to_path(storage_name)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use tempfile::tempdir;

    async fn collect(stream: ByteStream) -> Vec<u8> {
        stream
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let blob = storage
            .put("hello.txt", Bytes::from_static(b"hello world"))
            .await
            .unwrap();
        assert_eq!(blob.size_bytes, 11);
        assert!(blob.storage_name.ends_with("_hello.txt"));

        let data = collect(storage.get(&blob.storage_name).await.unwrap()).await;
        assert_eq!(data, b"hello world");
    }

    #[tokio::test]
    async fn identical_names_get_distinct_blobs() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let a = storage.put("dup.bin", Bytes::from_static(b"aa")).await.unwrap();
        let b = storage.put("dup.bin", Bytes::from_static(b"bb")).await.unwrap();
        assert_ne!(a.storage_name, b.storage_name);

        assert_eq!(collect(storage.get(&a.storage_name).await.unwrap()).await, b"aa");
        assert_eq!(collect(storage.get(&b.storage_name).await.unwrap()).await, b"bb");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let blob = storage.put("x.txt", Bytes::from_static(b"x")).await.unwrap();
        storage.delete(&blob.storage_name).await.unwrap();
        // Second delete of the same blob is a no-op, not an error.
        storage.delete(&blob.storage_name).await.unwrap();
        assert!(!storage.exists(&blob.storage_name).await.unwrap());
    }

    #[tokio::test]
    async fn forged_storage_names_are_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        for name in ["../../etc/passwd", "/etc/passwd", "a/b.txt", "..", ".hidden"] {
            assert!(
                matches!(storage.get(name).await, Err(StorageError::InvalidKey(_))),
                "get accepted {name}"
            );
            assert!(
                matches!(storage.delete(name).await, Err(StorageError::InvalidKey(_))),
                "delete accepted {name}"
            );
        }
    }

    #[tokio::test]
    async fn get_missing_blob_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        assert!(matches!(
            storage.get("deadbeef_missing.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }
}
