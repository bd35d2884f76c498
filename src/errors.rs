use axum::{http::StatusCode, Json};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned to HTTP callers. The message is the only thing the client sees.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Failures raised by the record store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Shape and range problems in an incoming entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("timestamp must not be empty")]
    EmptyTimestamp,

    #[error("bristol_score must be between 1 and 7, got {0}")]
    BristolScoreOutOfRange(i64),

    #[error("pain_level must be between 0 and 10, got {0}")]
    PainLevelOutOfRange(i64),
}
