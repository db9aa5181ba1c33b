//! Background removal: validate input, segment it, store the result

use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info};

use crate::backend::{SegmentationClient, SegmentationInput};
use crate::error::{AppError, Result};
use crate::storage::{is_allowed_image_type, ObjectStore};

/// Caller-supplied image for background removal
#[derive(Debug, Clone)]
pub enum RemovalSource {
    /// Uploaded file with the content type the client declared for it
    File {
        data: Vec<u8>,
        filename: String,
        content_type: Option<String>,
    },
    /// Remote image URL
    Url(String),
}

/// Orchestrates the segmentation call and the upload of its result
#[derive(Clone)]
pub struct BackgroundRemoval {
    http: Client,
    segmentation: SegmentationClient,
    store: Option<Arc<dyn ObjectStore>>,
}

impl BackgroundRemoval {
    /// `store` is `None` when object storage is not configured; every call then
    /// fails with a configuration error before any outbound request.
    pub fn new(
        http: Client,
        segmentation: SegmentationClient,
        store: Option<Arc<dyn ObjectStore>>,
    ) -> Self {
        Self {
            http,
            segmentation,
            store,
        }
    }

    /// Remove the background from `source` and return the stored image URL
    pub async fn remove(&self, source: RemovalSource) -> Result<String> {
        if let RemovalSource::File { content_type, .. } = &source {
            let declared = content_type.as_deref().unwrap_or_default();
            if !is_allowed_image_type(declared) {
                return Err(AppError::InvalidRequest(
                    "Only JPG, PNG and GIF images are supported".to_string(),
                ));
            }
        }

        let store = self.store.as_ref().ok_or_else(|| {
            AppError::Configuration("object storage is not configured".to_string())
        })?;
        self.segmentation.ensure_configured()?;

        let (input, filename) = match source {
            RemovalSource::File { data, filename, .. } => {
                let input = SegmentationInput::File {
                    data,
                    filename: filename.clone(),
                };
                (input, filename)
            }
            RemovalSource::Url(url) => {
                // The API fetches the image itself; the download only proves it is reachable.
                self.probe_url(&url).await?;
                let filename = format!("removed_bg_{}.png", Utc::now().timestamp());
                (SegmentationInput::Url(url), filename)
            }
        };

        let processed = self.segmentation.remove_background(input).await?;
        debug!(bytes = processed.len(), "Received processed image");

        let url = store.upload(processed, &filename).await?;
        info!(filename = %filename, "Background removed and stored");
        Ok(url)
    }

    async fn probe_url(&self, url: &str) -> Result<()> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to download image: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Failed to download image, status: {}",
                status.as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to download image: {}", e)))?;
        debug!(url = %url, bytes = bytes.len(), "Downloaded source image");
        Ok(())
    }
}
