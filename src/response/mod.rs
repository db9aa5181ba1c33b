//! Response handling - verbatim relay of upstream replies

use axum::{
    body::{Body, Bytes},
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::Result;

/// Upstream reply passed back to the caller without reinterpretation
#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

impl ProxiedResponse {
    /// Capture status, content type and body of an upstream response.
    ///
    /// A missing content type is reported as JSON.
    pub async fn from_upstream(response: reqwest::Response) -> Result<Self> {
        // reqwest and axum use different `http` major versions
        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();
        let body = response.bytes().await?;

        Ok(Self {
            status,
            content_type,
            body,
        })
    }
}

impl IntoResponse for ProxiedResponse {
    fn into_response(self) -> Response {
        let content_type = HeaderValue::from_str(&self.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/json"));

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        response.headers_mut().insert(CONTENT_TYPE, content_type);
        response
    }
}
