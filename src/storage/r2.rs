//! Cloudflare R2 object storage client

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{retry::RetryConfig, BehaviorVersion, Credentials, Region},
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client as S3Client,
};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{join_url_segment, ObjectStore, StorageError, StorageObject, StorageResult};
use crate::config::StorageConfig;

/// Public URL of an uploaded object, tagged by how it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicUrl {
    /// Explicit public domain override
    CustomDomain(String),
    /// Provider dev domain override
    DevDomain(String),
    /// Time-limited presigned GET
    Signed {
        url: String,
        expires_at: DateTime<Utc>,
    },
    /// Direct bucket endpoint; usually not publicly readable
    Fallback(String),
}

impl PublicUrl {
    pub fn as_str(&self) -> &str {
        match self {
            PublicUrl::CustomDomain(url)
            | PublicUrl::DevDomain(url)
            | PublicUrl::Signed { url, .. }
            | PublicUrl::Fallback(url) => url,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PublicUrl::CustomDomain(_) => "custom_domain",
            PublicUrl::DevDomain(_) => "dev_domain",
            PublicUrl::Signed { .. } => "signed",
            PublicUrl::Fallback(_) => "fallback",
        }
    }

    pub fn into_string(self) -> String {
        match self {
            PublicUrl::CustomDomain(url)
            | PublicUrl::DevDomain(url)
            | PublicUrl::Signed { url, .. }
            | PublicUrl::Fallback(url) => url,
        }
    }
}

/// Object storage client for an R2 (S3-compatible) bucket
pub struct R2Storage {
    client: S3Client,
    account_id: String,
    bucket_name: String,
    key_prefix: String,
    public_domain: Option<String>,
    dev_domain: Option<String>,
    presign_expiry: Duration,
}

impl R2Storage {
    /// Create a client from storage settings.
    ///
    /// Fails without touching the network when any required credential is empty.
    pub fn new(config: &StorageConfig) -> StorageResult<Self> {
        let missing = config.missing_credentials();
        if !missing.is_empty() {
            return Err(StorageError::MissingCredentials(missing));
        }

        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "r2-static",
        );

        let custom_endpoint = config.endpoint.clone().filter(|e| !e.is_empty());
        let path_style = custom_endpoint.is_some();
        let endpoint = custom_endpoint
            .unwrap_or_else(|| format!("https://{}.r2.cloudflarestorage.com", config.account_id));

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .credentials_provider(credentials)
            .endpoint_url(&endpoint)
            .force_path_style(path_style)
            .retry_config(RetryConfig::disabled())
            .build();

        debug!(endpoint = %endpoint, bucket = %config.bucket_name, "Created object storage client");

        Ok(Self {
            client: S3Client::from_conf(s3_config),
            account_id: config.account_id.clone(),
            bucket_name: config.bucket_name.clone(),
            key_prefix: config.key_prefix.clone(),
            public_domain: non_empty(&config.public_domain),
            dev_domain: non_empty(&config.dev_domain),
            presign_expiry: Duration::from_secs(config.presign_expiry_secs),
        })
    }

    /// Write an object to the bucket
    pub async fn put(&self, object: StorageObject) -> StorageResult<String> {
        let StorageObject {
            key,
            content_type,
            data,
        } = object;
        let size = data.len();

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .body(ByteStream::from(data))
            .content_type(content_type.as_ref())
            .send()
            .await
            .map_err(|e| StorageError::put_object(&key, e))?;

        info!(key = %key, bytes = size, content_type = %content_type, "Stored object");
        Ok(key)
    }

    /// Resolve a URL for `key`: custom domain, then dev domain, then a
    /// presigned GET, then the raw bucket endpoint.
    pub async fn resolve_public_url(&self, key: &str) -> PublicUrl {
        if let Some(domain) = &self.public_domain {
            return PublicUrl::CustomDomain(domain_url(domain, key));
        }

        if let Some(domain) = &self.dev_domain {
            return PublicUrl::DevDomain(domain_url(domain, key));
        }

        match self.presign_get(key).await {
            Ok(url) => PublicUrl::Signed {
                url,
                expires_at: Utc::now()
                    + chrono::Duration::seconds(self.presign_expiry.as_secs() as i64),
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Presigning failed, using direct bucket URL");
                let host = format!("{}.{}.r2.cloudflarestorage.com", self.bucket_name, self.account_id);
                PublicUrl::Fallback(domain_url(&host, key))
            }
        }
    }

    /// Generate a presigned GET URL valid for the configured expiry
    pub async fn presign_get(&self, key: &str) -> StorageResult<String> {
        let presigning = PresigningConfig::expires_in(self.presign_expiry)
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        Ok(request.uri().to_string())
    }
}

#[async_trait]
impl ObjectStore for R2Storage {
    async fn upload(&self, data: Vec<u8>, filename: &str) -> StorageResult<String> {
        let object = StorageObject::new(&self.key_prefix, Utc::now().timestamp(), filename, data);
        let key = self.put(object).await?;
        let url = self.resolve_public_url(&key).await;
        debug!(key = %key, kind = url.kind(), "Resolved public URL");
        Ok(url.into_string())
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.trim_end_matches('/').to_string())
}

/// Join a domain and key, adding `https://` unless the domain carries a scheme.
/// The key is percent-encoded as one path segment.
fn domain_url(domain: &str, key: &str) -> String {
    let base = if domain.starts_with("https://") || domain.starts_with("http://") {
        domain.to_string()
    } else {
        format!("https://{}", domain)
    };

    match join_url_segment(&base, key) {
        Some(url) => url.into(),
        None => format!("{}/{}", base, key),
    }
}
