mod config;
mod errors;
mod listings;
mod matching;
mod models;
mod routes;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::listings::http::HttpListingProvider;
use crate::listings::ListingProvider;
use crate::matching::fallback::FallbackCoordinator;
use crate::matching::recommender::Recommender;
use crate::matching::scoring::{JobScorer, ScoringWeights, WeightedJobScorer};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::JobStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Curated corpus: loaded once, shared read-only
    let store = Arc::new(
        JobStore::load(config.curated_dataset_path.as_deref())
            .context("Failed to load curated job dataset")?,
    );
    if store.is_empty() {
        warn!("Curated corpus is empty; recommendations depend entirely on the remote provider");
    }

    // Remote listing provider (optional)
    let provider: Option<Arc<dyn ListingProvider>> = match &config.listings_api_url {
        Some(url) => {
            let provider = HttpListingProvider::new(url.clone(), config.listings_api_key.clone())
                .context("Failed to build listing provider HTTP client")?;
            info!(
                "Remote listing provider enabled: {url} (timeout {}ms)",
                config.remote_timeout.as_millis()
            );
            Some(Arc::new(provider) as Arc<dyn ListingProvider>)
        }
        None => {
            info!("LISTINGS_API_URL not set; serving curated corpus only");
            None
        }
    };
    let remote_enabled = provider.is_some();

    // Scorer with the standard weight profile
    let scorer = Arc::new(
        WeightedJobScorer::new(ScoringWeights::default()).context("Invalid scoring weights")?,
    );
    info!("Scoring weights: {:?}", scorer.weights());

    let coordinator = FallbackCoordinator::new(store.clone(), provider, config.remote_timeout);
    let recommender = Recommender::new(coordinator, scorer);

    // Build app state
    let state = AppState {
        store,
        recommender,
        remote_enabled,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
