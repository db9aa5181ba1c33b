//! Liveness endpoints

use axum::{response::Html, Json};
use serde_json::{json, Value};

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/ping`
pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

/// `GET /api/hello`
pub async fn hello() -> Html<&'static str> {
    Html("<h1>Hello from the image gateway!</h1>")
}
