//! Upload/download orchestration.
//!
//! Upload: store every blob, then register the group, then render link + QR.
//! A failure at any point rolls the batch back; no registry entry ever
//! exists for a partially stored batch.
//!
//! Download: resolve the code, enforce expiry lazily, and only ever address
//! blobs through storage names belonging to the resolved group.

use std::sync::Arc;

use bytes::Bytes;
use droplink_core::{AppError, CodeSource, Config, FileGroup, StoredFile};
use droplink_db::GroupRepository;
use droplink_storage::{ByteStream, Storage, StorageError};

use crate::purge::purge_group;
use crate::qr::qr_data_url;

/// Attempts before giving up on finding a free share code. At 36^6 codes a
/// second collision in a row already means something is wrong.
const MAX_CODE_ATTEMPTS: u32 = 5;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One file taken from a multipart upload.
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// What an uploader gets back: the share code, the canonical download link,
/// and a QR data URL encoding that link. Never storage paths.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub code: String,
    pub download_link: String,
    pub qr_image: String,
}

#[derive(Clone)]
pub struct TransferService {
    config: Config,
    groups: GroupRepository,
    storage: Arc<dyn Storage>,
    codes: Arc<dyn CodeSource>,
}

impl TransferService {
    pub fn new(
        config: Config,
        groups: GroupRepository,
        storage: Arc<dyn Storage>,
        codes: Arc<dyn CodeSource>,
    ) -> Self {
        Self {
            config,
            groups,
            storage,
            codes,
        }
    }

    /// Store a batch of files under one fresh share code.
    #[tracing::instrument(skip(self, files), fields(file_count = files.len()))]
    pub async fn upload(&self, files: Vec<UploadedFile>) -> Result<UploadReceipt, AppError> {
        if files.is_empty() {
            return Err(AppError::NoFiles);
        }

        let mut stored: Vec<StoredFile> = Vec::with_capacity(files.len());
        for file in files {
            match self.storage.put(&file.original_name, file.data).await {
                Ok(blob) => stored.push(StoredFile {
                    storage_name: blob.storage_name,
                    original_name: file.original_name,
                    size_bytes: blob.size_bytes as i64,
                    content_type: file
                        .content_type
                        .filter(|ct| !ct.is_empty())
                        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
                }),
                Err(e) => {
                    tracing::error!(error = %e, "blob store failed, aborting batch");
                    self.discard_blobs(&stored).await;
                    return Err(AppError::Storage(e.to_string()));
                }
            }
        }

        let group = match self.register_with_retry(&stored).await {
            Ok(group) => group,
            Err(e) => {
                self.discard_blobs(&stored).await;
                return Err(e);
            }
        };

        let download_link = self.config.download_link(&group.code);
        let qr_image = qr_data_url(&download_link)?;

        tracing::info!(
            group.code = %group.code,
            file_count = group.files.len(),
            "upload complete"
        );

        Ok(UploadReceipt {
            code: group.code,
            download_link,
            qr_image,
        })
    }

    /// Resolve a code to a live group. Discovering an expired group deletes
    /// it (blobs + registry entry) before reporting it gone, so an expired
    /// code is never served between reaper sweeps.
    pub async fn resolve(&self, code: &str) -> Result<FileGroup, AppError> {
        let Some(group) = self.groups.lookup(code).await? else {
            return Err(AppError::NotFound("unknown share code".to_string()));
        };

        if group.is_expired() {
            purge_group(self.storage.as_ref(), &self.groups, &group).await;
            return Err(AppError::Expired);
        }

        Ok(group)
    }

    /// Open one file of a group for streaming. The storage name must be a
    /// member of the resolved group; anything else is rejected without ever
    /// touching storage.
    pub async fn open_file(
        &self,
        code: &str,
        storage_name: &str,
    ) -> Result<(StoredFile, ByteStream), AppError> {
        let group = self.resolve(code).await?;

        let file = group
            .file(storage_name)
            .ok_or(AppError::InvalidFileReference)?
            .clone();

        let stream = self.storage.get(&file.storage_name).await.map_err(|e| match e {
            StorageError::NotFound(_) => AppError::NotFound("file content missing".to_string()),
            other => AppError::Storage(other.to_string()),
        })?;

        Ok((file, stream))
    }

    async fn register_with_retry(&self, files: &[StoredFile]) -> Result<FileGroup, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.codes.generate();
            match self
                .groups
                .create_group(&code, files, self.config.file_ttl)
                .await
            {
                Err(AppError::DuplicateCode) => {
                    tracing::warn!(attempt, "share code collision, retrying with a fresh code");
                }
                other => return other,
            }
        }
        Err(AppError::Internal(
            "exhausted share code attempts".to_string(),
        ))
    }

    /// Best-effort removal of blobs stored for a batch that failed before
    /// its group was registered.
    async fn discard_blobs(&self, stored: &[StoredFile]) {
        for file in stored {
            if let Err(e) = self.storage.delete(&file.storage_name).await {
                tracing::error!(
                    storage_name = %file.storage_name,
                    error = %e,
                    "failed to discard blob of aborted upload"
                );
            }
        }
    }
}
