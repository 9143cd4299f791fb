//! `recommend`: the single entry point callers use.
//!
//! gather (fallback) → score → categorize → filter. Profile and filters must
//! already be validated; see `ProfileRequest::validate` and
//! `FilterRequest::validate`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::matching::categorize::{categorize, CategorizedJobs, Category};
use crate::matching::fallback::{FallbackCoordinator, RemoteOutcome, SourceStatus};
use crate::matching::filters::{apply_filters, FilterSpec};
use crate::matching::scoring::{JobScorer, ScoredJob};
use crate::models::CandidateProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    Ok,
    /// Neither source produced a usable posting. Callers should fall back to
    /// static guidance content.
    NoResults,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub status: RecommendationStatus,
    pub sources: SourceStatus,
    pub remote: RemoteOutcome,
    pub dropped_invalid: usize,
    pub candidates_scored: usize,
    pub generated_at: DateTime<Utc>,
    pub categories: CategorizedJobs,
}

#[derive(Clone)]
pub struct Recommender {
    coordinator: FallbackCoordinator,
    scorer: Arc<dyn JobScorer>,
}

impl Recommender {
    pub fn new(coordinator: FallbackCoordinator, scorer: Arc<dyn JobScorer>) -> Self {
        Self { coordinator, scorer }
    }

    pub async fn recommend(
        &self,
        profile: &CandidateProfile,
        filters: &FilterSpec,
    ) -> Recommendations {
        let candidates = self.coordinator.gather_candidates(profile, filters).await;

        if candidates.status == SourceStatus::NoCandidates {
            info!("No candidate postings from any source; returning no_results");
            return Recommendations {
                status: RecommendationStatus::NoResults,
                sources: candidates.status,
                remote: candidates.remote,
                dropped_invalid: candidates.dropped_invalid,
                candidates_scored: 0,
                generated_at: Utc::now(),
                categories: categorize(&[]),
            };
        }

        let scored: Vec<ScoredJob> = candidates
            .jobs
            .iter()
            .map(|job| self.scorer.score(profile, job))
            .collect();

        let categories = apply_filters(categorize(&scored), filters);

        debug!(
            scored = scored.len(),
            recommended = categories.get(&Category::Recommended).map(Vec::len).unwrap_or(0),
            "Recommendations computed"
        );

        Recommendations {
            status: RecommendationStatus::Ok,
            sources: candidates.status,
            remote: candidates.remote,
            dropped_invalid: candidates.dropped_invalid,
            candidates_scored: scored.len(),
            generated_at: Utc::now(),
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::matching::filters::LocationFilter;
    use crate::matching::scoring::WeightedJobScorer;
    use crate::models::fixtures::{job_with, profile};
    use crate::models::{CompanySize, ExperienceLevel, LocationPreference, LocationType};
    use crate::store::JobStore;

    fn recommender(store: JobStore) -> Recommender {
        let coordinator = FallbackCoordinator::new(Arc::new(store), None, Duration::from_secs(4));
        Recommender::new(coordinator, Arc::new(WeightedJobScorer::default()))
    }

    fn store() -> JobStore {
        JobStore::from_records(vec![
            job_with("a", &["react", "css", "node"], LocationType::Remote, Some((90_000, 140_000)), CompanySize::Medium),
            job_with("b", &["java"], LocationType::Onsite, Some((60_000, 80_000)), CompanySize::Large),
            job_with("c", &["react"], LocationType::Remote, None, CompanySize::Large),
        ])
    }

    fn react_profile() -> CandidateProfile {
        profile(&["react", "css"], ExperienceLevel::Mid, LocationPreference::Remote, Some(100_000))
    }

    #[tokio::test]
    async fn test_end_to_end_categories() {
        let result = recommender(store())
            .recommend(&react_profile(), &FilterSpec::default())
            .await;

        assert_eq!(result.status, RecommendationStatus::Ok);
        assert_eq!(result.sources, SourceStatus::CuratedOnly);
        assert_eq!(result.remote, RemoteOutcome::Disabled);
        assert_eq!(result.candidates_scored, 3);

        let recommended: Vec<&str> = result.categories[&Category::Recommended]
            .iter()
            .map(|s| s.job.id.as_str())
            .collect();
        // c: 1.0 skill, remote, no salary -> 0.95; a: 0.8167; b: below threshold
        assert_eq!(recommended, vec!["c", "a"]);

        let high_salary: Vec<&str> = result.categories[&Category::HighSalary]
            .iter()
            .map(|s| s.job.id.as_str())
            .collect();
        assert_eq!(high_salary, vec!["a"]);

        let notable: Vec<&str> = result.categories[&Category::NotableEmployer]
            .iter()
            .map(|s| s.job.id.as_str())
            .collect();
        assert_eq!(notable, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_filters_applied_after_categorizing() {
        let filters = FilterSpec {
            location: LocationFilter::Onsite,
            ..Default::default()
        };
        let result = recommender(store()).recommend(&react_profile(), &filters).await;
        assert!(result.categories[&Category::Recommended].is_empty());
        assert!(result.categories[&Category::Remote].is_empty());
        assert_eq!(result.categories[&Category::NotableEmployer].len(), 1);
        // filtering never changes how many postings were scored
        assert_eq!(result.candidates_scored, 3);
    }

    #[tokio::test]
    async fn test_empty_corpus_returns_no_results() {
        let result = recommender(JobStore::default())
            .recommend(&react_profile(), &FilterSpec::default())
            .await;
        assert_eq!(result.status, RecommendationStatus::NoResults);
        assert_eq!(result.sources, SourceStatus::NoCandidates);
        assert_eq!(result.categories.len(), 4);
        assert!(result.categories.values().all(Vec::is_empty));
    }

    #[tokio::test]
    async fn test_serialized_shape() {
        let result = recommender(store())
            .recommend(&react_profile(), &FilterSpec::default())
            .await;
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["remote"]["outcome"], "disabled");
        let first = &json["categories"]["recommended"][0];
        assert_eq!(first["id"], "c");
        assert_eq!(first["source"], "curated");
        assert!(first["score_breakdown"]["skill"]["contribution"].is_number());
        assert!(first["reasoning"].is_array());
        assert!(json["categories"]["highSalary"].is_array());
    }
}
