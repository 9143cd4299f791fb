pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/recommendations",
            post(handlers::handle_recommend),
        )
        .route("/api/v1/jobs", get(handlers::handle_list_jobs))
        .route("/api/v1/jobs/:id", get(handlers::handle_get_job))
        .with_state(state)
}
