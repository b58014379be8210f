use std::time::Duration;

use chrono::{DateTime, Utc};
use droplink_core::{normalize_code, AppError, FileGroup, StoredFile};
use sqlx::SqlitePool;

/// Repository for file groups, keyed by share code.
///
/// The group row and its file rows are always written and removed inside one
/// transaction: a committed group is fully visible or not at all.
#[derive(Clone)]
pub struct GroupRepository {
    pool: SqlitePool,
}

impl GroupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a group under `code`. Fails with `AppError::DuplicateCode`
    /// when the code is already taken by a live (or expired-but-unreaped)
    /// group; the caller retries with a fresh code.
    #[tracing::instrument(
        skip(self, files),
        fields(db.table = "file_groups", db.operation = "insert", group.code = %code)
    )]
    pub async fn create_group(
        &self,
        code: &str,
        files: &[StoredFile],
        ttl: Duration,
    ) -> Result<FileGroup, AppError> {
        if files.is_empty() {
            return Err(AppError::NoFiles);
        }

        let created_at = Utc::now();
        let expires_at = created_at
            + chrono::Duration::from_std(ttl)
                .map_err(|e| AppError::Internal(format!("ttl out of range: {}", e)))?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO file_groups (code, created_at, expires_at) VALUES (?1, ?2, ?3)")
            .bind(code)
            .bind(created_at)
            .bind(expires_at)
            .execute(&mut *tx)
            .await
            .map_err(map_insert_error)?;

        for (position, file) in files.iter().enumerate() {
            sqlx::query(
                "INSERT INTO group_files \
                 (storage_name, code, position, original_name, size_bytes, content_type) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&file.storage_name)
            .bind(code)
            .bind(position as i64)
            .bind(&file.original_name)
            .bind(file.size_bytes)
            .bind(&file.content_type)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            group.code = %code,
            file_count = files.len(),
            expires_at = %expires_at,
            "file group registered"
        );

        Ok(FileGroup {
            code: code.to_string(),
            files: files.to_vec(),
            created_at,
            expires_at,
        })
    }

    /// Fetch a group by (normalized) code, expired or not. Callers decide
    /// whether an expired group is served or reaped.
    #[tracing::instrument(skip(self), fields(db.table = "file_groups", db.operation = "select"))]
    pub async fn lookup(&self, code: &str) -> Result<Option<FileGroup>, AppError> {
        let code = normalize_code(code);

        let group: Option<(String, DateTime<Utc>, DateTime<Utc>)> =
            sqlx::query_as("SELECT code, created_at, expires_at FROM file_groups WHERE code = ?1")
                .bind(&code)
                .fetch_optional(&self.pool)
                .await?;

        let Some((code, created_at, expires_at)) = group else {
            return Ok(None);
        };

        let files: Vec<(String, String, i64, String)> = sqlx::query_as(
            "SELECT storage_name, original_name, size_bytes, content_type \
             FROM group_files WHERE code = ?1 ORDER BY position",
        )
        .bind(&code)
        .fetch_all(&self.pool)
        .await?;

        // Groups are created with at least one file in the same transaction,
        // so an empty file list means a concurrent delete landed between the
        // two reads. Report the post-delete state.
        if files.is_empty() {
            return Ok(None);
        }

        Ok(Some(FileGroup {
            code,
            files: files
                .into_iter()
                .map(
                    |(storage_name, original_name, size_bytes, content_type)| StoredFile {
                        storage_name,
                        original_name,
                        size_bytes,
                        content_type,
                    },
                )
                .collect(),
            created_at,
            expires_at,
        }))
    }

    /// Remove a group and its file rows. Returns whether the group existed;
    /// deleting an absent group is a no-op so the reaper and a lazy delete
    /// can race on the same code.
    #[tracing::instrument(skip(self), fields(db.table = "file_groups", db.operation = "delete"))]
    pub async fn delete_group(&self, code: &str) -> Result<bool, AppError> {
        let code = normalize_code(code);

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM group_files WHERE code = ?1")
            .bind(&code)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM file_groups WHERE code = ?1")
            .bind(&code)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// All groups whose expiry lies before `cutoff`, oldest first. The reaper
    /// passes `now - grace` so downloads that started just before expiry are
    /// not raced.
    #[tracing::instrument(skip(self), fields(db.table = "file_groups", db.operation = "select"))]
    pub async fn expired_groups(&self, cutoff: DateTime<Utc>) -> Result<Vec<FileGroup>, AppError> {
        let codes: Vec<(String,)> = sqlx::query_as(
            "SELECT code FROM file_groups WHERE expires_at < ?1 ORDER BY expires_at",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        let mut groups = Vec::with_capacity(codes.len());
        for (code,) in codes {
            if let Some(group) = self.lookup(&code).await? {
                groups.push(group);
            }
        }
        Ok(groups)
    }
}

fn map_insert_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return AppError::DuplicateCode;
        }
    }
    AppError::Database(e)
}
