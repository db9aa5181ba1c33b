//! Route table and middleware stack

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::api::handlers::{background, debug, generation, health, upload};
use crate::middleware::{request_id_of, UuidRequestId};
use crate::AppState;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let settings = state.settings.clone();

    let mut router = Router::new()
        .route("/generate-image", post(generation::generate_image))
        .route("/getTaskInfo", get(generation::get_task_info))
        .route("/uploadImg", post(upload::upload_image))
        .route("/remove-background", post(background::remove_background))
        .route("/health", get(health::health))
        .route("/api/ping", get(health::ping))
        .route("/api/hello", get(health::hello));

    if settings.debug.enabled {
        router = router.route("/debug/env", get(debug::debug_env));
    }

    let router = router
        .layer(DefaultBodyLimit::max(settings.server.max_body_bytes))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id_of(request),
                        )
                    }),
                )
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

    if settings.server.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
