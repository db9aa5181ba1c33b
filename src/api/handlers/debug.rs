//! Configuration introspection with masked secrets

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::AppState;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct VariableStatus {
    pub exists: bool,
    pub masked_value: String,
    pub length: usize,
}

impl VariableStatus {
    pub fn of(value: &str) -> Self {
        Self {
            exists: !value.is_empty(),
            masked_value: mask_secret(value),
            length: value.chars().count(),
        }
    }
}

/// Hide all but the first and last four characters of a secret
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    match chars.len() {
        0 => "<unset>".to_string(),
        1..=8 => "***set***".to_string(),
        n => {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[n - 4..].iter().collect();
            format!("{}***{}", head, tail)
        }
    }
}

/// `GET /debug/env`
pub async fn debug_env(State(state): State<Arc<AppState>>) -> Json<Value> {
    let settings = &state.settings;
    let storage = &settings.storage;

    let variables = [
        ("R2_ACCOUNT_ID", storage.account_id.as_str()),
        ("R2_ACCESS_KEY_ID", storage.access_key_id.as_str()),
        ("R2_SECRET_ACCESS_KEY", storage.secret_access_key.as_str()),
        ("R2_BUCKET_NAME", storage.bucket_name.as_str()),
        ("R2_DEV_DOMAIN", storage.dev_domain.as_deref().unwrap_or_default()),
        ("R2_PUBLIC_DOMAIN", storage.public_domain.as_deref().unwrap_or_default()),
        ("PHOTOROOM_API_KEY", settings.segmentation.api_key.as_str()),
        ("BLOB_READ_WRITE_TOKEN", settings.blob.token.as_str()),
        ("IMAGE_GEN_API_TOKEN", settings.generation.api_token.as_str()),
    ];

    let env_vars: Map<String, Value> = variables
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                serde_json::to_value(VariableStatus::of(value)).unwrap_or(Value::Null),
            )
        })
        .collect();

    Json(json!({
        "message": "Environment and object storage check",
        "env_vars": env_vars,
        "storage_client": {
            "success": state.storage_configured,
            "missing": storage.missing_credentials(),
        },
    }))
}
