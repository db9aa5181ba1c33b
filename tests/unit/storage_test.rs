//! Object storage tests against a mock S3 endpoint

use chrono::Utc;
use image_gateway::config::StorageConfig;
use image_gateway::storage::{ObjectStore, PublicUrl, R2Storage, StorageError};
use wiremock::matchers::{header, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn storage_config(endpoint: &str) -> StorageConfig {
    StorageConfig {
        account_id: "acct123".into(),
        access_key_id: "AKIDEXAMPLE".into(),
        secret_access_key: "wJalrXUtnFEMI".into(),
        bucket_name: "test-bucket".into(),
        endpoint: Some(endpoint.to_string()),
        ..StorageConfig::default()
    }
}

#[tokio::test]
async fn test_upload_puts_object_and_returns_custom_domain_url() {
    let s3 = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/test-bucket/bg_removed_\d+_a\.png$"))
        .and(header("content-type", "image/png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&s3)
        .await;

    let mut config = storage_config(&s3.uri());
    config.public_domain = Some("img.example.com".into());
    let storage = R2Storage::new(&config).unwrap();

    let url = storage.upload(b"png-bytes".to_vec(), "a.png").await.unwrap();

    assert!(url.starts_with("https://img.example.com/bg_removed_"));
    assert!(url.ends_with("_a.png"));
}

#[tokio::test]
async fn test_upload_returns_signed_url_without_domains() {
    let s3 = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/test-bucket/bg_removed_\d+_a\.png$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&s3)
        .await;

    let storage = R2Storage::new(&storage_config(&s3.uri())).unwrap();
    let url = storage.upload(b"png-bytes".to_vec(), "a.png").await.unwrap();

    assert!(url.starts_with(&s3.uri()));
    assert!(url.contains("_a.png?"));
    assert!(url.contains("X-Amz-Expires=604800"));
    assert!(url.contains("X-Amz-Signature="));
}

#[tokio::test]
async fn test_signed_url_expires_seven_days_after_issue() {
    let storage = R2Storage::new(&storage_config("http://127.0.0.1:9")).unwrap();

    let issued = Utc::now();
    let url = storage.resolve_public_url("bg_removed_1_a.png").await;

    match url {
        PublicUrl::Signed { url, expires_at } => {
            assert!(url.contains("X-Amz-Expires=604800"));
            let lifetime = expires_at - issued;
            assert!(lifetime <= chrono::Duration::days(7) + chrono::Duration::seconds(5));
            assert!(lifetime >= chrono::Duration::days(7) - chrono::Duration::seconds(5));
        }
        other => panic!("expected a signed URL, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dev_domain_with_scheme_is_used_as_is() {
    let mut config = storage_config("http://127.0.0.1:9");
    config.dev_domain = Some("https://pub-abc.r2.dev/".into());
    let storage = R2Storage::new(&config).unwrap();

    let url = storage.resolve_public_url("k.png").await;
    assert_eq!(url, PublicUrl::DevDomain("https://pub-abc.r2.dev/k.png".into()));
}

#[tokio::test]
async fn test_failed_put_is_reported_with_key() {
    let s3 = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .expect(1)
        .mount(&s3)
        .await;

    let storage = R2Storage::new(&storage_config(&s3.uri())).unwrap();
    let err = storage.upload(b"x".to_vec(), "a.png").await.unwrap_err();

    match err {
        StorageError::PutObject { key, .. } => assert!(key.ends_with("_a.png")),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_incomplete_credentials_never_reach_the_network() {
    let s3 = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&s3)
        .await;

    let mut config = storage_config(&s3.uri());
    config.secret_access_key.clear();

    match R2Storage::new(&config) {
        Err(StorageError::MissingCredentials(missing)) => {
            assert_eq!(missing, vec!["R2_SECRET_ACCESS_KEY"]);
        }
        _ => panic!("construction must fail"),
    }
}
