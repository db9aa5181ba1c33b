//! Common error types for the image gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Build an upstream error carrying the remote status and body for diagnosis
    pub fn upstream_status(service: &str, status: u16, body: &str) -> Self {
        AppError::Upstream(format!(
            "{} request failed, status: {}, response: {}",
            service, status, body
        ))
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Configuration(_)
            | AppError::HttpClient(_)
            | AppError::Storage(_)
            | AppError::Upstream(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log the error at a level matching its status
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "Client error");
        } else {
            tracing::error!(status = status.as_u16(), error = %self, "Server error");
        }
    }
}

/// Error body returned by the relay and upload endpoints
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
