//! Buckets scored jobs by fixed category predicates.
//!
//! Memberships are independent: one job may land in several categories.
//! Every ordering ends with `id` ascending so output is reproducible.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::matching::scoring::ScoredJob;
use crate::models::{CompanySize, LocationType};

/// Minimum score for the `recommended` bucket.
pub const RECOMMENDED_MIN_SCORE: f64 = 0.5;
/// Minimum salary max for the `highSalary` bucket.
pub const HIGH_SALARY_MIN: u32 = 120_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Recommended,
    Remote,
    HighSalary,
    NotableEmployer,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Recommended,
        Category::Remote,
        Category::HighSalary,
        Category::NotableEmployer,
    ];

    pub fn admits(self, scored: &ScoredJob) -> bool {
        match self {
            Category::Recommended => scored.score >= RECOMMENDED_MIN_SCORE,
            Category::Remote => scored.job.location_type == LocationType::Remote,
            Category::HighSalary => scored
                .job
                .salary_max()
                .map(|max| max >= HIGH_SALARY_MIN)
                .unwrap_or(false),
            Category::NotableEmployer => scored.job.company_size == CompanySize::Large,
        }
    }

    fn order(self, a: &ScoredJob, b: &ScoredJob) -> Ordering {
        let primary = match self {
            Category::HighSalary => b
                .job
                .salary_max()
                .cmp(&a.job.salary_max())
                .then_with(|| b.score.total_cmp(&a.score)),
            _ => b.score.total_cmp(&a.score),
        };
        primary.then_with(|| a.job.id.cmp(&b.job.id))
    }
}

pub type CategorizedJobs = BTreeMap<Category, Vec<ScoredJob>>;

/// Partitions scored jobs into every category. All four keys are always present.
pub fn categorize(scored: &[ScoredJob]) -> CategorizedJobs {
    Category::ALL
        .into_iter()
        .map(|category| {
            let mut members: Vec<ScoredJob> = scored
                .iter()
                .filter(|s| category.admits(s))
                .cloned()
                .collect();
            members.sort_by(|a, b| category.order(a, b));
            (category, members)
        })
        .collect()
}
