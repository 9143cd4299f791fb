use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 4000;

/// Application configuration loaded from environment variables.
/// Everything has a default: with no environment at all the service runs on
/// the bundled curated dataset with the remote provider disabled.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub curated_dataset_path: Option<PathBuf>,
    pub listings_api_url: Option<String>,
    pub listings_api_key: Option<String>,
    pub remote_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = optional("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let remote_timeout_ms = match optional("REMOTE_TIMEOUT_MS") {
            Some(v) => v
                .parse::<u64>()
                .with_context(|| format!("REMOTE_TIMEOUT_MS must be a whole number of milliseconds, got '{v}'"))?,
            None => DEFAULT_REMOTE_TIMEOUT_MS,
        };

        Ok(Config {
            port,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            curated_dataset_path: optional("CURATED_DATASET_PATH").map(PathBuf::from),
            listings_api_url: optional("LISTINGS_API_URL"),
            listings_api_key: optional("LISTINGS_API_KEY"),
            remote_timeout: Duration::from_millis(remote_timeout_ms),
        })
    }
}
