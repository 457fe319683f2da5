//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Message-carrying variants display their message verbatim; it becomes the
/// `error` field of the JSON body the dashboard reads.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required query parameter is absent or empty
    #[error("{0}")]
    MissingParameter(String),

    /// A query parameter is present but cannot be used
    #[error("{0}")]
    InvalidParameter(String),

    /// The `type` parameter names a view this endpoint does not serve
    #[error("Unsupported type: '{0}'")]
    UnsupportedType(String),

    /// The requested subfield, topic, level or year does not exist
    #[error("{0}")]
    NotFound(String),

    /// A dataset file could not be read or parsed
    #[error("{0}")]
    DatasetUnavailable(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedType(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatasetUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
