use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored blob. The storage name is both the on-disk name and the opaque
/// identifier handed out in download listings; the original name is only ever
/// used for the Content-Disposition header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    pub storage_name: String,
    pub original_name: String,
    pub size_bytes: i64,
    pub content_type: String,
}

/// One upload transaction: an ordered, non-empty set of stored files
/// addressable by a single share code. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileGroup {
    pub code: String,
    pub files: Vec<StoredFile>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl FileGroup {
    /// Whether the group is past its expiry at the given instant. An expired
    /// group is logically gone even if not yet physically reaped.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Look up a file by its opaque storage identifier. Returns `None` for
    /// identifiers that do not belong to this group, which callers must treat
    /// as not-found rather than consulting storage directly.
    pub fn file(&self, storage_name: &str) -> Option<&StoredFile> {
        self.files.iter().find(|f| f.storage_name == storage_name)
    }
}
