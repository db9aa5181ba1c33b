//! Configuration module

pub mod settings;

pub use settings::{
    BlobConfig, DebugConfig, GenerationConfig, HttpConfig, LoggingConfig, SegmentationConfig,
    ServerConfig, Settings, StorageConfig, MAX_PRESIGN_EXPIRY_SECS,
};
