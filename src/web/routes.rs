//! Web API router construction.

use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::state::AppState;
use crate::web::{retrieve, scrape, status};

/// Creates the web server router.
///
/// The request timeout is generous because a scrape run blocks on the
/// remote site's retry/backoff schedule (worst case tens of seconds per
/// suboption).
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(status::health))
        .route("/production", get(retrieve::production))
        .route("/processing", get(retrieve::processing))
        .route("/commercialization", get(retrieve::commercialization))
        .route("/import", get(retrieve::imports))
        .route("/export", get(retrieve::exports))
        .route("/scrape", post(scrape::scrape_all))
        .route("/scrape/{page}", post(scrape::scrape_page))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(600)))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
