use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use droplink_core::AppError;
use droplink_services::UploadedFile;
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub code: String,
    pub download_link: String,
    /// PNG of the download link as a base64 data URL.
    pub qr_image: String,
}

/// `POST /upload` — multipart body with one or more parts under the `files`
/// field. The whole batch gets one share code; an empty batch is a 400.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Internal(format!("multipart read failed: {}", e)))?
    {
        if field.name() != Some("files") {
            continue;
        }

        let original_name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or("file")
            .to_string();
        let content_type = field.content_type().map(str::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Internal(format!("multipart read failed: {}", e)))?;

        files.push(UploadedFile {
            original_name,
            content_type,
            data,
        });
    }

    let receipt = state.transfer.upload(files).await?;

    Ok(Json(UploadResponse {
        code: receipt.code,
        download_link: receipt.download_link,
        qr_image: receipt.qr_image,
    }))
}
