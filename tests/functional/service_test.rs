//! Functional tests for liveness and introspection endpoints

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

use common::{app, send, send_json, settings_for};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_ping_and_health() {
    let settings = settings_for("http://127.0.0.1:9");

    let (status, body) = send_json(app(settings.clone(), None), get("/api/ping")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "pong" }));

    let (status, body) = send_json(app(settings, None), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let response = {
        use tower::ServiceExt;
        app(settings_for("http://127.0.0.1:9"), None)
            .oneshot(get("/api/hello"))
            .await
            .unwrap()
    };

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_debug_endpoint_hidden_by_default() {
    let (status, _) = send(app(settings_for("http://127.0.0.1:9"), None), get("/debug/env")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_debug_endpoint_masks_secrets() {
    let mut settings = settings_for("http://127.0.0.1:9");
    settings.debug.enabled = true;
    settings.storage.account_id = "acct".into();
    settings.storage.secret_access_key = "0123456789abcdefSECRET".into();

    let (status, body) = send(app(settings, None), get("/debug/env")).await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(body).unwrap();
    assert!(!text.contains("0123456789abcdefSECRET"));
    assert!(!text.contains("seg-key"));
    assert!(!text.contains("blob-token"));

    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        body["env_vars"]["R2_SECRET_ACCESS_KEY"]["masked_value"],
        "0123***CRET"
    );
    assert_eq!(body["env_vars"]["R2_SECRET_ACCESS_KEY"]["length"], 22);
    assert_eq!(body["env_vars"]["R2_BUCKET_NAME"]["exists"], false);
    assert_eq!(body["storage_client"]["success"], false);
    assert_eq!(
        body["storage_client"]["missing"],
        json!(["R2_ACCESS_KEY_ID", "R2_BUCKET_NAME"])
    );
}
