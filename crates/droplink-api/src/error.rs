//! HTTP error response conversion.
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; domain errors
//! convert via `From<AppError>` and render as a consistent JSON body with a
//! machine-readable code. 5xx bodies never expose internal detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use droplink_core::AppError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling.
    pub code: String,
}

/// Wrapper for `AppError` so `IntoResponse` can be implemented here
/// (orphan rule: both trait and type are foreign).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = match err {
            AppError::NoFiles => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::InvalidFileReference => StatusCode::NOT_FOUND,
            AppError::Expired => StatusCode::GONE,
            AppError::Storage(_)
            | AppError::DuplicateCode
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status.is_server_error() {
            tracing::error!(error = %err, code = err.code(), "request failed");
            "internal server error".to_string()
        } else {
            err.to_string()
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: err.code().to_string(),
            }),
        )
            .into_response()
    }
}
