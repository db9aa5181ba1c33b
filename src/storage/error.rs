//! Error types for object storage operations

use aws_sdk_s3::{error::SdkError, operation::put_object::PutObjectError};
use thiserror::Error;

/// Result type for object storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while storing objects
#[derive(Error, Debug)]
pub enum StorageError {
    /// Required credentials are empty
    #[error("object storage is not configured, missing: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    /// Upload rejected by the storage service
    #[error("put object '{key}' failed: {message}")]
    PutObject { key: String, message: String },

    /// Presigned URL generation failed
    #[error("presign failed: {0}")]
    Presign(String),
}

impl StorageError {
    pub(crate) fn put_object(key: &str, error: SdkError<PutObjectError>) -> Self {
        let message = match &error {
            SdkError::ServiceError(service_err) => format!(
                "status {}: {}",
                service_err.raw().status().as_u16(),
                service_err.err()
            ),
            other => other.to_string(),
        };

        Self::PutObject {
            key: key.to_string(),
            message,
        }
    }
}
