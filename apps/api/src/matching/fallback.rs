//! Gathers candidate postings from the curated store and the remote provider.
//!
//! Policy, in order:
//! 1. one remote fetch, bounded by a timeout; every failure is absorbed into
//!    a `RemoteOutcome` and never propagated
//! 2. the curated store is always read, concurrently with the fetch
//! 3. merge with curated-first precedence on `(company, title)`
//! 4. an empty merge yields `SourceStatus::NoCandidates`, not an error

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::listings::validation::into_job_record;
use crate::listings::{ListingProvider, ListingQuery, ProviderError};
use crate::matching::dedup::merge_sources;
use crate::matching::filters::{FilterSpec, LocationFilter};
use crate::models::{CandidateProfile, JobRecord, LocationPreference};
use crate::store::JobStore;

/// What happened to the remote attempt for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RemoteOutcome {
    /// No provider configured.
    Disabled,
    Fetched { count: usize },
    Empty,
    Failed { reason: String },
    TimedOut { after_ms: u64 },
}

/// Which sources contributed at least one record after the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    CuratedAndRemote,
    CuratedOnly,
    RemoteOnly,
    NoCandidates,
}

#[derive(Debug, Clone)]
pub struct CandidateSet {
    pub jobs: Vec<JobRecord>,
    pub status: SourceStatus,
    pub remote: RemoteOutcome,
    pub dropped_invalid: usize,
}

struct RemoteFetch {
    jobs: Vec<JobRecord>,
    outcome: RemoteOutcome,
    dropped_invalid: usize,
}

impl RemoteFetch {
    fn without_jobs(outcome: RemoteOutcome) -> Self {
        Self {
            jobs: Vec::new(),
            outcome,
            dropped_invalid: 0,
        }
    }
}

#[derive(Clone)]
pub struct FallbackCoordinator {
    store: Arc<JobStore>,
    provider: Option<Arc<dyn ListingProvider>>,
    remote_timeout: Duration,
}

impl FallbackCoordinator {
    pub fn new(
        store: Arc<JobStore>,
        provider: Option<Arc<dyn ListingProvider>>,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            store,
            provider,
            remote_timeout,
        }
    }

    pub async fn gather_candidates(
        &self,
        profile: &CandidateProfile,
        filters: &FilterSpec,
    ) -> CandidateSet {
        let query = build_query(profile, filters);

        let (remote, curated) = tokio::join!(self.fetch_remote(&query), async {
            self.store.all()
        });

        let merged = merge_sources(curated, remote.jobs);

        let status = match (merged.curated_kept > 0, merged.remote_kept > 0) {
            (true, true) => SourceStatus::CuratedAndRemote,
            (true, false) => SourceStatus::CuratedOnly,
            (false, true) => SourceStatus::RemoteOnly,
            (false, false) => SourceStatus::NoCandidates,
        };

        debug!(
            curated = merged.curated_kept,
            remote = merged.remote_kept,
            duplicates = merged.duplicates_dropped,
            status = ?status,
            "Candidate set gathered"
        );

        CandidateSet {
            jobs: merged.jobs,
            status,
            remote: remote.outcome,
            dropped_invalid: remote.dropped_invalid,
        }
    }

    async fn fetch_remote(&self, query: &ListingQuery) -> RemoteFetch {
        let Some(provider) = &self.provider else {
            return RemoteFetch::without_jobs(RemoteOutcome::Disabled);
        };

        let result = tokio::time::timeout(self.remote_timeout, provider.fetch_listings(query)).await;

        let batch = match result {
            Ok(Ok(batch)) => batch,
            Ok(Err(e)) => {
                warn!(
                    provider = provider.name(),
                    error = %e,
                    "Remote listing provider failed, continuing with curated corpus"
                );
                return RemoteFetch::without_jobs(RemoteOutcome::Failed {
                    reason: describe(&e),
                });
            }
            Err(_) => {
                warn!(
                    provider = provider.name(),
                    timeout_ms = self.remote_timeout.as_millis() as u64,
                    "Remote listing provider timed out, continuing with curated corpus"
                );
                return RemoteFetch::without_jobs(RemoteOutcome::TimedOut {
                    after_ms: self.remote_timeout.as_millis() as u64,
                });
            }
        };

        let mut jobs = Vec::with_capacity(batch.listings.len());
        let mut dropped_invalid = batch.unreadable;

        for raw in batch.listings {
            match into_job_record(raw) {
                Ok(job) => jobs.push(job),
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Dropping invalid remote listing");
                    dropped_invalid += 1;
                }
            }
        }

        let outcome = if jobs.is_empty() {
            RemoteOutcome::Empty
        } else {
            RemoteOutcome::Fetched { count: jobs.len() }
        };

        RemoteFetch {
            jobs,
            outcome,
            dropped_invalid,
        }
    }
}

/// Caller-facing summary of a provider failure. Upstream bodies stay in the logs.
fn describe(error: &ProviderError) -> String {
    match error {
        ProviderError::Status { status, .. } => format!("provider returned status {status}"),
        ProviderError::Http(e) if e.is_timeout() => "request timed out".to_string(),
        ProviderError::Http(e) if e.is_connect() => "connection failed".to_string(),
        other => other.to_string(),
    }
}

/// Builds the provider query from the profile and the active filters. An
/// explicit location filter takes precedence over the profile preference.
pub fn build_query(profile: &CandidateProfile, filters: &FilterSpec) -> ListingQuery {
    let location = match filters.location {
        LocationFilter::Remote => Some("remote"),
        LocationFilter::Onsite => Some("onsite"),
        LocationFilter::Hybrid => Some("hybrid"),
        LocationFilter::Any => match profile.preferred_location_type {
            LocationPreference::Remote => Some("remote"),
            LocationPreference::Onsite => Some("onsite"),
            LocationPreference::Any => None,
        },
    };

    let level = filters.experience.unwrap_or(profile.experience_level);

    ListingQuery {
        skills: profile.skills.iter().cloned().collect(),
        location: location.map(str::to_string),
        keywords: vec![level.as_str().to_string()],
    }
}
