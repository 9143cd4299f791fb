use std::sync::Arc;

use crate::config::Config;
use crate::matching::recommender::Recommender;
use crate::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Curated corpus. Read-only after startup.
    pub store: Arc<JobStore>,
    pub recommender: Recommender,
    /// Whether a remote listing provider is configured; reported by /health.
    pub remote_enabled: bool,
    pub config: Config,
}
