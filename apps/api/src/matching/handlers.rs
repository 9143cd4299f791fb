//! Axum route handlers for the Recommendations API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::filters::FilterRequest;
use crate::matching::recommender::Recommendations;
use crate::models::{JobRecord, ProfileRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub profile: ProfileRequest,
    #[serde(default)]
    pub filters: FilterRequest,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub total: usize,
    pub jobs: Vec<JobRecord>,
}

/// POST /api/v1/recommendations
///
/// Validates the profile and filters, then runs the full matching pipeline.
/// Undecodable bodies are reported as validation errors like any other.
/// An empty corpus comes back as `status: "no_results"`, not as an error.
pub async fn handle_recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<Recommendations>, AppError> {
    let Json(request) = payload?;
    let profile = request.profile.validate()?;
    let filters = request.filters.validate()?;

    let recommendations = state.recommender.recommend(&profile, &filters).await;

    Ok(Json(recommendations))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<JobListResponse> {
    Json(JobListResponse {
        total: state.store.len(),
        jobs: state.store.all().to_vec(),
    })
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobRecord>, AppError> {
    state
        .store
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}
