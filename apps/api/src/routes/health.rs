use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version plus the shape of the data sources.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobmatch-api",
        "curated_jobs": state.store.len(),
        "remote_provider": state.remote_enabled,
        "remote_timeout_ms": state.config.remote_timeout.as_millis() as u64
    }))
}
