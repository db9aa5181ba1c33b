//! Image Gateway
//!
//! HTTP gateway relaying image generation, background removal and file uploads
//! to third-party services and object storage.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod response;
pub mod storage;

pub use error::{AppError, Result};

use std::sync::Arc;
use tracing::{info, warn};

use backend::{build_http_client, BlobClient, GenerationClient, SegmentationClient};
use gateway::BackgroundRemoval;
use storage::{ObjectStore, R2Storage};

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub generation: GenerationClient,
    pub blob: BlobClient,
    pub background_removal: BackgroundRemoval,
    pub storage_configured: bool,
}

impl AppState {
    /// Build every client from settings.
    ///
    /// Incomplete storage credentials leave object storage disabled rather than
    /// failing startup; background removal then reports a configuration error.
    pub fn from_settings(settings: config::Settings) -> Result<Self> {
        let store: Option<Arc<dyn ObjectStore>> = match R2Storage::new(&settings.storage) {
            Ok(storage) => {
                info!(bucket = %settings.storage.bucket_name, "Object storage configured");
                Some(Arc::new(storage))
            }
            Err(e) => {
                warn!(error = %e, "Object storage disabled");
                None
            }
        };

        Self::with_object_store(settings, store)
    }

    /// Build state around an explicit object store
    pub fn with_object_store(
        settings: config::Settings,
        store: Option<Arc<dyn ObjectStore>>,
    ) -> Result<Self> {
        let http = build_http_client(&settings.http)?;

        let segmentation = SegmentationClient::new(http.clone(), &settings.segmentation);
        let storage_configured = store.is_some();

        Ok(Self {
            generation: GenerationClient::new(http.clone(), &settings.generation),
            blob: BlobClient::new(http.clone(), &settings.blob),
            background_removal: BackgroundRemoval::new(http, segmentation, store),
            storage_configured,
            settings: Arc::new(settings),
        })
    }
}
