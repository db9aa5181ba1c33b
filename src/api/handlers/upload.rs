//! Upload relay handler

use axum::extract::{multipart::MultipartRejection, Multipart, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::read_file_field;
use crate::error::{AppError, Result};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// `POST /uploadImg` with multipart field `file`
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let missing_file = || AppError::InvalidRequest("Please choose a file to upload".to_string());

    let mut multipart = multipart.map_err(|_| missing_file())?;
    let file = read_file_field(&mut multipart, "file")
        .await?
        .ok_or_else(missing_file)?;

    let url = state.blob.upload(file.data, &file.filename).await?;
    Ok(Json(UploadResponse { url }))
}
