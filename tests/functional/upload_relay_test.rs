//! Functional tests for the blob storage upload relay

mod common;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{header, header_regex, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{app, json_request, multipart_request, send_json, settings_for};

#[tokio::test]
async fn test_upload_returns_blob_url() {
    let upstream = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/\d{14}-cat\.jpg$"))
        .and(header("authorization", "Bearer blob-token"))
        .and(header("content-type", "application/octet-stream"))
        .and(header("x-vercel-blob-content-type", "image/jpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://blob.test/20240101000000-cat.jpg",
            "pathname": "20240101000000-cat.jpg"
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = app(settings_for(&upstream.uri()), None);
    let request = multipart_request("/uploadImg", "file", "cat.jpg", "image/jpeg", b"jpeg-bytes");
    let (status, body) = send_json(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "url": "https://blob.test/20240101000000-cat.jpg" }));
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let upstream = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let app = app(settings_for(&upstream.uri()), None);
    let request = multipart_request("/uploadImg", "attachment", "cat.jpg", "image/jpeg", b"x");
    let (status, body) = send_json(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please choose a file to upload");
}

#[tokio::test]
async fn test_upload_with_json_body_is_rejected() {
    let upstream = MockServer::start().await;
    let app = app(settings_for(&upstream.uri()), None);

    let request = json_request("POST", "/uploadImg", &json!({ "file": "cat.jpg" }));
    let (status, _) = send_json(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_surfaces_blob_store_failure() {
    let upstream = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_string("token expired"))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = app(settings_for(&upstream.uri()), None);
    let request = multipart_request("/uploadImg", "file", "cat.jpg", "image/jpeg", b"x");
    let (status, body) = send_json(app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("403"));
    assert!(message.contains("token expired"));
}

#[tokio::test]
async fn test_upload_without_token_fails_before_upstream() {
    let upstream = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let mut settings = settings_for(&upstream.uri());
    settings.blob.token.clear();

    let app = app(settings, None);
    let request = multipart_request("/uploadImg", "file", "cat.jpg", "image/jpeg", b"x");
    let (status, _) = send_json(app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_upload_filename_with_reserved_characters_stays_in_path() {
    let upstream = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/\d{14}-cat%231%3F\.jpg$"))
        .and(header_regex("x-vercel-blob-filename", r"^\d{14}-cat#1\?\.jpg$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://blob.test/cat%231%3F.jpg"
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = app(settings_for(&upstream.uri()), None);
    let request = multipart_request("/uploadImg", "file", "cat#1?.jpg", "image/jpeg", b"jpeg-bytes");
    let (status, body) = send_json(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://blob.test/cat%231%3F.jpg");
}
