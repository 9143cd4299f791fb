//! JSON-over-HTTP listing provider.
//!
//! Issues a single `GET {base_url}?skills=..&location=..&keywords=..` and
//! accepts either a bare JSON array of listings or an object wrapping one
//! under `jobs`, `results` or `data`. Items that fail to decode are skipped
//! and counted; only an unusable envelope fails the response. No retries here: the coordinator owns
//! the timeout and falls back to the curated corpus on any failure.
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::listings::{ListingBatch, ListingProvider, ListingQuery, ProviderError, RawListing};

const USER_AGENT: &str = concat!("jobmatch-api/", env!("CARGO_PKG_VERSION"));
const ENVELOPE_KEYS: &[&str] = &["jobs", "results", "data"];

/// Upstream error bodies are cut to this many characters before they are kept.
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Clone)]
pub struct HttpListingProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpListingProvider {
    pub fn new(base_url: String, api_key: Option<String>) -> Result<Self, ProviderError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl ListingProvider for HttpListingProvider {
    async fn fetch_listings(&self, query: &ListingQuery) -> Result<ListingBatch, ProviderError> {
        let mut params: Vec<(&str, String)> = vec![
            ("skills", query.skills.join(",")),
            ("keywords", query.keywords.join(" ")),
        ];
        if let Some(location) = &query.location {
            params.push(("location", location.clone()));
        }

        let mut request = self.client.get(&self.base_url).query(&params);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let batch = parse_listings_body(body)?;
        debug!(
            listings = batch.listings.len(),
            unreadable = batch.unreadable,
            "Listing provider responded"
        );
        Ok(batch)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Extracts the listing array from a provider response body. A mistyped item
/// is skipped and counted in `unreadable` without touching its neighbours.
fn parse_listings_body(body: Value) -> Result<ListingBatch, ProviderError> {
    let array = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                ProviderError::Malformed("object response without a listing array".to_string())
            })?,
        other => {
            return Err(ProviderError::Malformed(format!(
                "expected array or object, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut batch = ListingBatch::default();
    for item in array {
        match serde_json::from_value::<RawListing>(item) {
            Ok(listing) => batch.listings.push(listing),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable provider listing");
                batch.unreadable += 1;
            }
        }
    }
    Ok(batch)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
