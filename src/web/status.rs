//! Health handler.

use axum::extract::State;
use axum::response::Json;
use serde_json::{Value, json};
use tracing::trace;

use crate::state::AppState;

/// Health check endpoint. Verifies database connectivity.
pub(super) async fn health(State(state): State<AppState>) -> Json<Value> {
    trace!("health check requested");
    let db_ok = sqlx::query("SELECT 1")
        .execute(&state.db_pool)
        .await
        .is_ok();

    Json(json!({
        "status": if db_ok { "healthy" } else { "degraded" },
        "database": db_ok,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
