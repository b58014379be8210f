use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use droplink_core::AppError;
use serde::{Deserialize, Serialize};

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// Opaque storage identifier from a previous listing.
    file: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedFile {
    pub storage_id: String,
    pub original_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupListing {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub files: Vec<ListedFile>,
}

/// `GET /download/{code}` — without `file`, a JSON listing of the group;
/// with `file`, streams that blob as an attachment. 404 for unknown codes
/// and foreign file identifiers, 410 for expired codes.
#[tracing::instrument(skip(state))]
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, HttpAppError> {
    match query.file {
        None => {
            let group = state.transfer.resolve(&code).await?;
            let listing = GroupListing {
                code: group.code,
                expires_at: group.expires_at,
                files: group
                    .files
                    .into_iter()
                    .map(|f| ListedFile {
                        storage_id: f.storage_name,
                        original_name: f.original_name,
                    })
                    .collect(),
            };
            Ok(Json(listing).into_response())
        }
        Some(storage_id) => {
            let (file, stream) = state.transfer.open_file(&code, &storage_id).await?;

            let response = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, &file.content_type)
                .header(header::CONTENT_LENGTH, file.size_bytes)
                .header(
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}\"",
                        disposition_filename(&file.original_name)
                    ),
                )
                .body(Body::from_stream(stream))
                .map_err(|e| AppError::Internal(format!("failed to build response: {}", e)))?;

            Ok(response)
        }
    }
}

/// Keep the disposition header well-formed whatever the client originally
/// named the file.
fn disposition_filename(original_name: &str) -> String {
    original_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
