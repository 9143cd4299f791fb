//! Weighted multi-criteria match between a profile and one job.
//!
//! Default: `WeightedJobScorer`, pure and deterministic.
//! `Recommender` holds an `Arc<dyn JobScorer>`; weights are injected through the
//! constructor and never mutated, so differently-weighted scorers can serve
//! concurrent requests side by side.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CandidateProfile, CompanySize, ExperienceLevel, JobRecord, LocationType};

/// Sub-scores strictly above this produce a line of reasoning.
pub const REASONING_THRESHOLD: f64 = 0.6;

/// Culture score when the profile and the company share no tags.
const NEUTRAL_CULTURE_SCORE: f64 = 0.5;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Skill,
    Experience,
    Location,
    Salary,
    Culture,
}

impl Criterion {
    /// Fixed evaluation order; reasoning follows it.
    pub const ALL: [Criterion; 5] = [
        Criterion::Skill,
        Criterion::Experience,
        Criterion::Location,
        Criterion::Salary,
        Criterion::Culture,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skill: f64,
    pub experience: f64,
    pub location: f64,
    pub salary: f64,
    pub culture: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill: 0.40,
            experience: 0.25,
            location: 0.15,
            salary: 0.10,
            culture: 0.10,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("weight for {criterion:?} must be a finite non-negative number, got {value}")]
    Invalid { criterion: Criterion, value: f64 },

    #[error("weights must sum to 1.0, got {0}")]
    BadSum(f64),
}

impl ScoringWeights {
    pub fn weight(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Skill => self.skill,
            Criterion::Experience => self.experience,
            Criterion::Location => self.location,
            Criterion::Salary => self.salary,
            Criterion::Culture => self.culture,
        }
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        for criterion in Criterion::ALL {
            let value = self.weight(criterion);
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::Invalid { criterion, value });
            }
        }
        let sum: f64 = Criterion::ALL.iter().map(|c| self.weight(*c)).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::BadSum(sum));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriterionScore {
    pub sub_score: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// A job annotated with its match against one profile. Request-scoped.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredJob {
    #[serde(flatten)]
    pub job: JobRecord,
    pub score: f64,
    pub score_breakdown: BTreeMap<Criterion, CriterionScore>,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub reasoning: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the pipeline.
pub trait JobScorer: Send + Sync {
    fn score(&self, profile: &CandidateProfile, job: &JobRecord) -> ScoredJob;

    fn weights(&self) -> ScoringWeights;
}

// ────────────────────────────────────────────────────────────────────────────
// WeightedJobScorer
// ────────────────────────────────────────────────────────────────────────────

/// Five normalized sub-scores combined by fixed weights:
///
/// | criterion  | default | sub-score |
/// |------------|---------|-----------|
/// | skill      | 0.40 | matched / required (0 when the job lists none) |
/// | experience | 0.25 | 1.0 same level, 0.5 adjacent, 0.0 otherwise |
/// | location   | 0.15 | 1.0 when the preference accepts the job's location type |
/// | salary     | 0.10 | 1.0 when max ≥ minimum (or either is unknown), else max / minimum |
/// | culture    | 0.10 | 1.0 on any tag overlap, else 0.5 |
#[derive(Debug, Clone)]
pub struct WeightedJobScorer {
    weights: ScoringWeights,
}

impl WeightedJobScorer {
    pub fn new(weights: ScoringWeights) -> Result<Self, WeightsError> {
        weights.validate()?;
        Ok(Self { weights })
    }
}

impl Default for WeightedJobScorer {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }
}

impl JobScorer for WeightedJobScorer {
    fn score(&self, profile: &CandidateProfile, job: &JobRecord) -> ScoredJob {
        let (skill, matched_skills) = skill_match(&profile.skills, &job.required_skills);
        let missing_skills: BTreeSet<String> = job
            .required_skills
            .difference(&matched_skills)
            .cloned()
            .collect();

        let sub_scores = [
            (Criterion::Skill, skill),
            (
                Criterion::Experience,
                experience_match(profile.experience_level, job.implied_level()),
            ),
            (
                Criterion::Location,
                location_match(profile, job.location_type),
            ),
            (
                Criterion::Salary,
                salary_match(profile.min_salary, job.salary_max()),
            ),
            (
                Criterion::Culture,
                culture_match(&profile.culture_preferences, job.company_size),
            ),
        ];

        let mut score_breakdown = BTreeMap::new();
        let mut reasoning = Vec::new();
        let mut total = 0.0;

        for (criterion, sub_score) in sub_scores {
            let weight = self.weights.weight(criterion);
            let contribution = weight * sub_score;
            total += contribution;
            score_breakdown.insert(
                criterion,
                CriterionScore {
                    sub_score,
                    weight,
                    contribution,
                },
            );
            if sub_score > REASONING_THRESHOLD {
                reasoning.push(explain(criterion, profile, job, matched_skills.len()));
            }
        }

        ScoredJob {
            job: job.clone(),
            score: total.clamp(0.0, 1.0),
            score_breakdown,
            matched_skills,
            missing_skills,
            reasoning,
        }
    }

    fn weights(&self) -> ScoringWeights {
        self.weights
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sub-scores
// ────────────────────────────────────────────────────────────────────────────

/// Fraction of the job's required skills the candidate has. A job listing no
/// skills is a miss, not a perfect match.
pub fn skill_match(
    profile_skills: &BTreeSet<String>,
    required: &BTreeSet<String>,
) -> (f64, BTreeSet<String>) {
    if required.is_empty() {
        return (0.0, BTreeSet::new());
    }
    let matched: BTreeSet<String> = required.intersection(profile_skills).cloned().collect();
    (matched.len() as f64 / required.len() as f64, matched)
}

pub fn experience_match(profile: ExperienceLevel, job: ExperienceLevel) -> f64 {
    match profile.rank().abs_diff(job.rank()) {
        0 => 1.0,
        1 => 0.5,
        _ => 0.0,
    }
}

pub fn location_match(profile: &CandidateProfile, location_type: LocationType) -> f64 {
    if profile.preferred_location_type.accepts(location_type) {
        1.0
    } else {
        0.0
    }
}

pub fn salary_match(min_salary: Option<u32>, salary_max: Option<u32>) -> f64 {
    match (min_salary, salary_max) {
        (Some(min), Some(max)) if max < min => (max as f64 / min as f64).clamp(0.0, 1.0),
        _ => 1.0,
    }
}

/// Culture tags implied by company size. Company size is the only culture
/// signal a posting carries, so the taxonomy is deliberately coarse.
pub fn culture_tags(size: CompanySize) -> &'static [&'static str] {
    match size {
        CompanySize::Startup => &["startup", "fast-paced", "ownership", "innovative"],
        CompanySize::Medium => &["growth", "collaborative", "balanced"],
        CompanySize::Large => &["enterprise", "stable", "structured", "mentorship"],
    }
}

pub fn culture_match(preferences: &BTreeSet<String>, size: CompanySize) -> f64 {
    if culture_tags(size)
        .iter()
        .any(|tag| preferences.contains(*tag))
    {
        1.0
    } else {
        NEUTRAL_CULTURE_SCORE
    }
}

fn explain(
    criterion: Criterion,
    profile: &CandidateProfile,
    job: &JobRecord,
    matched: usize,
) -> String {
    match criterion {
        Criterion::Skill => format!(
            "Strong skill overlap ({matched}/{} required skills)",
            job.required_skills.len()
        ),
        Criterion::Experience => {
            format!("Experience level match ({})", job.implied_level())
        }
        Criterion::Location => match job.location_type {
            LocationType::Remote => "Remote-friendly match".to_string(),
            other => format!("{} role fits your location preference", capitalize(other.as_str())),
        },
        Criterion::Salary => match (profile.min_salary, job.salary_max()) {
            (Some(min), Some(max)) => {
                format!("Salary up to {max} meets your {min} minimum")
            }
            _ => "Compatible with your salary expectations".to_string(),
        },
        Criterion::Culture => {
            format!("Culture fit with a {} company", job.company_size.as_str())
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
