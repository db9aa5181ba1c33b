//! Image generation relay handlers

use axum::extract::{
    rejection::{JsonRejection, QueryRejection},
    Query, State,
};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::backend::GenerateImageRequest;
use crate::error::{AppError, Result};
use crate::response::ProxiedResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TaskInfoQuery {
    #[serde(rename = "taskId")]
    pub task_id: Option<String>,
}

/// `POST /generate-image`
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<ProxiedResponse> {
    let Json(request) = payload.map_err(|e| {
        debug!(error = %e, "Rejected generation payload");
        AppError::InvalidRequest("Invalid request parameters".to_string())
    })?;

    state.generation.generate(&request).await
}

/// `GET /getTaskInfo?taskId=`
pub async fn get_task_info(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<TaskInfoQuery>, QueryRejection>,
) -> Result<ProxiedResponse> {
    let Query(query) = query.map_err(|e| {
        debug!(error = %e, "Rejected task info query");
        AppError::InvalidRequest("Invalid request parameters".to_string())
    })?;
    let task_id = query.task_id.unwrap_or_default();
    state.generation.task_info(&task_id).await
}
