//! Background-removal (segmentation) API client

use reqwest::{
    multipart::{Form, Part},
    Client,
};
use tracing::{debug, warn};

use crate::backend::{error_body, require_credential};
use crate::config::SegmentationConfig;
use crate::error::{AppError, Result};
use crate::storage::is_allowed_image_type;

const SERVICE: &str = "Segmentation API";

/// What the segmentation API is asked to process
#[derive(Debug, Clone)]
pub enum SegmentationInput {
    /// Uploaded image bytes
    File { data: Vec<u8>, filename: String },
    /// Remote image the API fetches itself
    Url(String),
}

/// Client for the segmentation API
#[derive(Clone)]
pub struct SegmentationClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl SegmentationClient {
    pub fn new(client: Client, config: &SegmentationConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Fail early when no API key is configured
    pub fn ensure_configured(&self) -> Result<()> {
        require_credential("PHOTOROOM_API_KEY", &self.api_key).map(|_| ())
    }

    /// Send an image for background removal and return the processed bytes.
    ///
    /// For file input the response content type must be an allowed image type.
    pub async fn remove_background(&self, input: SegmentationInput) -> Result<Vec<u8>> {
        let api_key = require_credential("PHOTOROOM_API_KEY", &self.api_key)?;
        let validate_response = matches!(input, SegmentationInput::File { .. });

        let form = match input {
            SegmentationInput::File { data, filename } => {
                debug!(filename = %filename, bytes = data.len(), "Segmenting uploaded image");
                Form::new().part("image_file", Part::bytes(data).file_name(filename))
            }
            SegmentationInput::Url(url) => {
                debug!(url = %url, "Segmenting remote image");
                Form::new().text("image_url", url)
            }
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-Key", api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("{} request failed: {}", SERVICE, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            warn!(status = status.as_u16(), "Segmentation API returned an error");
            return Err(AppError::upstream_status(SERVICE, status.as_u16(), &body));
        }

        if validate_response {
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();

            if !is_allowed_image_type(&content_type) {
                let body = error_body(response).await;
                return Err(AppError::Upstream(format!(
                    "Expected an image response but received '{}': {}",
                    content_type, body
                )));
            }
        }

        let bytes = response.bytes().await.map_err(|e| {
            AppError::Upstream(format!("Failed to read processed image: {}", e))
        })?;

        Ok(bytes.to_vec())
    }
}
