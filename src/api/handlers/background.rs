//! Background removal handler

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::read_file_field;
use crate::error::{AppError, Result};
use crate::gateway::RemovalSource;
use crate::AppState;

const MISSING_INPUT: &str = "Please upload an image file or provide an image URL";

#[derive(Debug, Default, Deserialize)]
pub struct RemoveBackgroundRequest {
    #[serde(default, rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct RemoveBackgroundResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// `POST /remove-background` with multipart field `image` or JSON `{imageUrl}`
pub async fn remove_background(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let result = match read_source(request).await {
        Ok(source) => state.background_removal.remove(source).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(url) => Json(RemoveBackgroundResponse {
            success: true,
            message: "Background removed successfully".to_string(),
            image_url: Some(url),
        })
        .into_response(),
        Err(err) => failure(err),
    }
}

async fn read_source(request: Request) -> Result<RemovalSource> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(invalid_body)?;

        let file = read_file_field(&mut multipart, "image")
            .await?
            .ok_or_else(|| AppError::InvalidRequest(MISSING_INPUT.to_string()))?;

        return Ok(RemovalSource::File {
            data: file.data,
            filename: file.filename,
            content_type: file.content_type,
        });
    }

    let body = Bytes::from_request(request, &())
        .await
        .map_err(invalid_body)?;
    let parsed: RemoveBackgroundRequest = serde_json::from_slice(&body).unwrap_or_default();

    let url = parsed.image_url.trim();
    if url.is_empty() {
        return Err(AppError::InvalidRequest(MISSING_INPUT.to_string()));
    }

    Ok(RemovalSource::Url(url.to_string()))
}

fn invalid_body(rejection: impl std::fmt::Display) -> AppError {
    AppError::InvalidRequest(format!("Invalid request body: {}", rejection))
}

/// Render a failure as `{success: false, message}` with the error's status
fn failure(err: AppError) -> Response {
    err.log();
    let message = match &err {
        AppError::InvalidRequest(message) => message.clone(),
        other => format!("Background removal failed: {}", other),
    };

    let body = Json(RemoveBackgroundResponse {
        success: false,
        message,
        image_url: None,
    });

    (err.status_code(), body).into_response()
}
