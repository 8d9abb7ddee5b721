//! Axum router wiring (scrape + liveness).
//!
//! `/metrics` renders the registry snapshot; `/health` is a pure liveness
//! signal with no registry dependency.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;

use runbeacon_core::render;

use crate::app_state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .with_state(state)
}

/// Best-effort current snapshot; always 200, even if the most recent
/// updater tick failed.
pub async fn metrics(
    State(state): State<AppState>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let body = render::render(&state.registry().snapshot());
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, render::TEXT_FORMAT)],
        body,
    )
}

pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
