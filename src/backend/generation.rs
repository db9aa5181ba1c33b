//! Image generation API relay

use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::require_credential;
use crate::config::GenerationConfig;
use crate::error::{AppError, Result};
use crate::response::ProxiedResponse;

/// Inbound generation request
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerateImageRequest {
    #[serde(default, rename = "imageUrls")]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub size: String,
    #[serde(default, rename = "callBackUrl")]
    pub callback_url: String,
}

impl GenerateImageRequest {
    /// Reject requests missing any required field
    pub fn validate(&self) -> Result<()> {
        if self.image_urls.iter().all(|url| url.trim().is_empty()) {
            return Err(AppError::InvalidRequest(
                "At least one image URL is required".to_string(),
            ));
        }
        if self.prompt.trim().is_empty() {
            return Err(AppError::InvalidRequest("prompt is required".to_string()));
        }
        if self.size.trim().is_empty() {
            return Err(AppError::InvalidRequest("size is required".to_string()));
        }
        if self.callback_url.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Callback URL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Body shape expected by the upstream generation API
#[derive(Debug, Serialize)]
struct UpstreamGenerateRequest<'a> {
    #[serde(rename = "filesUrl")]
    files_url: &'a [String],
    prompt: &'a str,
    size: &'a str,
    #[serde(rename = "callBackUrl")]
    callback_url: &'a str,
}

/// Transparent client for the image generation API
#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl GenerationClient {
    pub fn new(client: Client, config: &GenerationConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        }
    }

    /// Submit a generation task and relay the upstream reply verbatim
    pub async fn generate(&self, request: &GenerateImageRequest) -> Result<ProxiedResponse> {
        request.validate()?;
        let token = require_credential("IMAGE_GEN_API_TOKEN", &self.api_token)?;

        let body = UpstreamGenerateRequest {
            files_url: &request.image_urls,
            prompt: &request.prompt,
            size: &request.size,
            callback_url: &request.callback_url,
        };

        let url = format!("{}/generate", self.base_url);
        debug!(url = %url, images = request.image_urls.len(), "Submitting generation task");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to send generation request: {}", e)))?;

        let proxied = ProxiedResponse::from_upstream(response).await?;
        info!(status = proxied.status.as_u16(), "Generation task relayed");
        Ok(proxied)
    }

    /// Fetch task details and relay the upstream reply verbatim
    pub async fn task_info(&self, task_id: &str) -> Result<ProxiedResponse> {
        if task_id.trim().is_empty() {
            return Err(AppError::InvalidRequest("Task ID cannot be empty".to_string()));
        }
        let token = require_credential("IMAGE_GEN_API_TOKEN", &self.api_token)?;

        let url = format!("{}/record-info", self.base_url);
        debug!(url = %url, task_id = %task_id, "Fetching task info");

        let response = self
            .client
            .get(&url)
            .query(&[("taskId", task_id)])
            .header(header::ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to send task info request: {}", e)))?;

        let proxied = ProxiedResponse::from_upstream(response).await?;
        info!(status = proxied.status.as_u16(), task_id = %task_id, "Task info relayed");
        Ok(proxied)
    }
}
