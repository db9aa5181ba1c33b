//! Request handlers

pub mod background;
pub mod debug;
pub mod generation;
pub mod health;
pub mod upload;

use axum::extract::Multipart;

use crate::error::{AppError, Result};

/// File part read from a multipart body
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: Option<String>,
}

/// Read the first file part named `name`, skipping all other parts
pub(crate) async fn read_file_field(
    multipart: &mut Multipart,
    name: &str,
) -> Result<Option<UploadedFile>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(name) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidRequest(format!("Failed to read uploaded file: {}", e)))?;

        return Ok(Some(UploadedFile {
            data: data.to_vec(),
            filename,
            content_type,
        }));
    }

    Ok(None)
}
