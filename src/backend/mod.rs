//! Backend module - clients for the third-party HTTP services

pub mod blob;
pub mod generation;
pub mod segmentation;

use reqwest::Client;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::error::{AppError, Result};

pub use blob::BlobClient;
pub use generation::{GenerateImageRequest, GenerationClient};
pub use segmentation::{SegmentationClient, SegmentationInput};

/// Build the outbound HTTP client shared by every backend
pub fn build_http_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Fail with a configuration error when a credential is empty
pub(crate) fn require_credential<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Configuration(format!("{} is not configured", name)));
    }
    Ok(value)
}

/// Read an error body for diagnostics without failing the caller
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default()
}
