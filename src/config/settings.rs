//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Longest lifetime an S3 presigned URL may have
pub const MAX_PRESIGN_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Deployment variables that override every other source, keyed by setting path
const WELL_KNOWN_ENV: &[(&str, &str)] = &[
    ("R2_ACCOUNT_ID", "storage.account_id"),
    ("R2_ACCESS_KEY_ID", "storage.access_key_id"),
    ("R2_SECRET_ACCESS_KEY", "storage.secret_access_key"),
    ("R2_BUCKET_NAME", "storage.bucket_name"),
    ("R2_PUBLIC_DOMAIN", "storage.public_domain"),
    ("R2_DEV_DOMAIN", "storage.dev_domain"),
    ("PHOTOROOM_API_KEY", "segmentation.api_key"),
    ("BLOB_READ_WRITE_TOKEN", "blob.token"),
    ("BLOB_STORE_BASE_URL", "blob.base_url"),
    ("IMAGE_GEN_API_TOKEN", "generation.api_token"),
    ("PORT", "server.port"),
];

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub blob: BlobConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_permissive: bool,
    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_permissive: false,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Outbound HTTP client configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Total request timeout; unset means outbound calls never time out
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Image generation API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_token: String,
}

fn default_generation_base_url() -> String {
    "https://kieai.erweima.ai/api/v1/gpt4o-image".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_generation_base_url(),
            api_token: String::new(),
        }
    }
}

/// Background-removal (segmentation) API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SegmentationConfig {
    #[serde(default = "default_segmentation_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
}

fn default_segmentation_endpoint() -> String {
    "https://sdk.photoroom.com/v1/segment".to_string()
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_segmentation_endpoint(),
            api_key: String::new(),
        }
    }
}

/// Blob storage used by the upload relay
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlobConfig {
    #[serde(default = "default_blob_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: String,
    /// Sent as the stored object's content type regardless of the upload
    #[serde(default = "default_blob_content_type")]
    pub content_type: String,
}

fn default_blob_base_url() -> String {
    "https://blob.vercel-storage.com".to_string()
}

fn default_blob_content_type() -> String {
    "image/jpeg".to_string()
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            base_url: default_blob_base_url(),
            token: String::new(),
            content_type: default_blob_content_type(),
        }
    }
}

/// S3-compatible object storage (Cloudflare R2)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
    #[serde(default)]
    pub bucket_name: String,
    /// Custom public domain serving the bucket
    #[serde(default)]
    pub public_domain: Option<String>,
    /// Provider dev domain (`pub-xxx.r2.dev`), with or without scheme
    #[serde(default)]
    pub dev_domain: Option<String>,
    /// Overrides the account endpoint; switches the client to path-style addressing
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "default_presign_expiry")]
    pub presign_expiry_secs: u64,
}

fn default_key_prefix() -> String {
    "bg_removed".to_string()
}

fn default_presign_expiry() -> u64 {
    MAX_PRESIGN_EXPIRY_SECS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            bucket_name: String::new(),
            public_domain: None,
            dev_domain: None,
            endpoint: None,
            key_prefix: default_key_prefix(),
            presign_expiry_secs: default_presign_expiry(),
        }
    }
}

impl StorageConfig {
    /// Names of the required credentials that are empty
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("R2_ACCOUNT_ID", &self.account_id),
            ("R2_ACCESS_KEY_ID", &self.access_key_id),
            ("R2_SECRET_ACCESS_KEY", &self.secret_access_key),
            ("R2_BUCKET_NAME", &self.bucket_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Introspection endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DebugConfig {
    #[serde(default)]
    pub enabled: bool,
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        let path = env::var("IMAGE_GATEWAY_CONFIG").unwrap_or_else(|_| "config/default".to_string());
        Self::load_from_path(path)
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            // Load from configuration file
            .add_source(File::with_name(path.as_ref().to_str().unwrap_or("config/default")).required(false))
            // Override with environment variables (prefixed with IMAGE_GATEWAY_)
            .add_source(
                Environment::with_prefix("IMAGE_GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in WELL_KNOWN_ENV {
            let value = env::var(var).ok().filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "Invalid log format '{}'. Must be 'json' or 'pretty'",
                self.logging.format
            ))));
        }

        let expiry = self.storage.presign_expiry_secs;
        if expiry == 0 || expiry > MAX_PRESIGN_EXPIRY_SECS {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "Presign expiry must be between 1 and {} seconds, got {}",
                MAX_PRESIGN_EXPIRY_SECS, expiry
            ))));
        }

        Ok(())
    }
}
