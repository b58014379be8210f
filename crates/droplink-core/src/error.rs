//! Error taxonomy for the whole application.
//!
//! All domain errors are unified under `AppError`. The api crate maps these
//! to HTTP status codes; nothing here knows about HTTP.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Upload contained no file parts. User error.
    #[error("no files uploaded")]
    NoFiles,

    /// Blob store I/O failure during write, read, or delete.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Generated code collided with a live group. Retried internally by the
    /// transfer service, never surfaced to clients.
    #[error("share code already in use")]
    DuplicateCode,

    /// Unknown share code or file identifier.
    #[error("not found: {0}")]
    NotFound(String),

    /// Code exists in the registry but its TTL has elapsed.
    #[error("share code expired")]
    Expired,

    /// Requested file identifier is not a member of the resolved group.
    /// The message never includes filesystem detail.
    #[error("file is not part of this share")]
    InvalidFileReference,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for API responses and logs.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NoFiles => "NO_FILES",
            AppError::Storage(_) => "STORAGE_FAILURE",
            AppError::DuplicateCode => "DUPLICATE_CODE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Expired => "EXPIRED",
            AppError::InvalidFileReference => "INVALID_FILE_REFERENCE",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
