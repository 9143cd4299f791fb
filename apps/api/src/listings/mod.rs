/// Remote Listing Provider boundary.
///
/// The matching pipeline only ever sees `JobRecord`s. Providers hand back
/// loosely-shaped `RawListing`s, which are mapped and validated in
/// `validation` before they reach the coordinator.
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod http;
pub mod validation;

pub use validation::RawListing;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// What the coordinator asks a provider for.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingQuery {
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub keywords: Vec<String>,
}

/// One provider response. `unreadable` counts items the provider received
/// but could not decode into a `RawListing`; they never fail the batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingBatch {
    pub listings: Vec<RawListing>,
    pub unreadable: usize,
}

impl From<Vec<RawListing>> for ListingBatch {
    fn from(listings: Vec<RawListing>) -> Self {
        Self {
            listings,
            unreadable: 0,
        }
    }
}

/// A source of additional postings. May fail, rate-limit, or return nothing;
/// callers are expected to absorb all of that.
///
/// Carried in `AppState` as `Option<Arc<dyn ListingProvider>>`.
#[async_trait]
pub trait ListingProvider: Send + Sync {
    async fn fetch_listings(&self, query: &ListingQuery) -> Result<ListingBatch, ProviderError>;

    fn name(&self) -> &str;
}
