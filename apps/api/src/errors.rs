use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractError;
use crate::upload::UploadRejection;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadRejection),

    #[error("Could not read document: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Status, machine-readable code and user-facing message. Server-side
    /// failures are logged here and their details kept out of the message.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upload(rejection) => {
                tracing::warn!("Upload rejected: {} ({rejection})", rejection.code());
                (StatusCode::BAD_REQUEST, rejection.code(), rejection.to_string())
            }
            AppError::Extraction(e) => {
                tracing::error!("Extraction error: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_FAILED",
                    "The uploaded document could not be read".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("Job 9 not found".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                AppError::Upload(UploadRejection::EmptyFilename),
                StatusCode::BAD_REQUEST,
                "EMPTY_FILENAME",
            ),
            (
                AppError::Extraction(ExtractError::Pdf("bad xref".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_FAILED",
            ),
            (
                AppError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            let (s, c, _) = err.parts();
            assert_eq!((s, c), (status, code));
        }
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let (_, _, message) = AppError::Internal(anyhow::anyhow!("db password wrong")).parts();
        assert!(!message.contains("password"));
    }
}
