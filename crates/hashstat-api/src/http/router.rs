//! Axum router configuration with middleware.
//!
//! Middleware: request tracing with a per-request id on the span.

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{any, get, post};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = uuid::Uuid::now_v7();
        tracing::info_span!(
            "request",
            %request_id,
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    Router::new()
        .route("/hash", post(handlers::hash::create_hash))
        .route("/hash/{id}", get(handlers::hash::get_hash))
        .route("/stats", get(handlers::stats::get_stats))
        .route("/shutdown", any(handlers::shutdown::shutdown))
        .route("/health", get(health_check))
        .layer(trace)
        .with_state(state)
}

/// GET /health - Simple liveness endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
