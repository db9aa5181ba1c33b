//! Object storage - S3-compatible uploads and public URL resolution

pub mod content_type;
mod error;
pub mod r2;

use async_trait::async_trait;
use mime::Mime;
use reqwest::Url;

pub use content_type::{is_allowed_image_type, resolve_content_type};
pub use error::{StorageError, StorageResult};
pub use r2::{PublicUrl, R2Storage};

/// Object about to be written to the bucket
#[derive(Debug, Clone)]
pub struct StorageObject {
    pub key: String,
    pub content_type: Mime,
    pub data: Vec<u8>,
}

impl StorageObject {
    /// Build an object keyed `<prefix>_<timestamp>_<filename>`.
    ///
    /// Keys are only unique to the second; two uploads of the same filename
    /// within one second overwrite each other.
    pub fn new(prefix: &str, timestamp: i64, filename: &str, data: Vec<u8>) -> Self {
        let filename = sanitize_filename(filename);
        Self {
            key: format!("{}_{}_{}", prefix, timestamp, filename),
            content_type: resolve_content_type(&filename),
            data,
        }
    }
}

/// Strip any directory components a client put in the filename
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() {
        "image.png".to_string()
    } else {
        base.to_string()
    }
}

/// Append `segment` to the path of `base` as a single percent-encoded segment.
///
/// Returns `None` when `base` is not an absolute URL that can carry a path.
pub fn join_url_segment(base: &str, segment: &str) -> Option<Url> {
    let mut url = Url::parse(base).ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().push(segment);
    Some(url)
}

/// Storage backend that returns a reachable URL for each uploaded object
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload bytes under a key derived from `filename` and return its public URL
    async fn upload(&self, data: Vec<u8>, filename: &str) -> StorageResult<String>;
}
