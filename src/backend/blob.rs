//! Blob storage upload relay

use chrono::{DateTime, Utc};
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::info;

use crate::backend::{error_body, require_credential};
use crate::config::BlobConfig;
use crate::error::{AppError, Result};
use crate::storage::{join_url_segment, sanitize_filename};

const SERVICE: &str = "Blob storage";

#[derive(Debug, Deserialize)]
struct BlobPutResponse {
    url: String,
}

/// Client that PUTs raw uploads to the blob store
#[derive(Clone)]
pub struct BlobClient {
    client: Client,
    base_url: String,
    token: String,
    content_type: String,
}

/// Unique blob name: `<YYYYMMDDhhmmss>-<original>`
pub fn blob_filename(now: DateTime<Utc>, original: &str) -> String {
    format!("{}-{}", now.format("%Y%m%d%H%M%S"), sanitize_filename(original))
}

impl BlobClient {
    pub fn new(client: Client, config: &BlobConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            content_type: config.content_type.clone(),
        }
    }

    /// Store the file and return the URL reported by the blob store
    pub async fn upload(&self, data: Vec<u8>, original_filename: &str) -> Result<String> {
        let token = require_credential("BLOB_READ_WRITE_TOKEN", &self.token)?;
        let filename = blob_filename(Utc::now(), original_filename);
        let size = data.len();
        let url = join_url_segment(&self.base_url, &filename).ok_or_else(|| {
            AppError::Configuration(format!("invalid blob store base URL: {}", self.base_url))
        })?;

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header("x-vercel-blob-filename", &filename)
            .header("x-vercel-blob-content-type", &self.content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("{} request failed: {}", SERVICE, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(AppError::upstream_status(SERVICE, status.as_u16(), &body));
        }

        let parsed: BlobPutResponse = response.json().await.map_err(|e| {
            AppError::Upstream(format!("{} returned an unreadable response: {}", SERVICE, e))
        })?;

        info!(filename = %filename, bytes = size, "Uploaded file to blob storage");
        Ok(parsed.url)
    }
}
