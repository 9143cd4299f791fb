//! Conjunctive user filters applied over categorized results.
//!
//! Filters only remove jobs. They never re-sort and never re-score, so each
//! filtered category is a subsequence of its input and filtering twice is the
//! same as filtering once.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::categorize::CategorizedJobs;
use crate::models::{ExperienceLevel, JobRecord, LocationType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationFilter {
    #[default]
    Any,
    Remote,
    Onsite,
    Hybrid,
}

impl LocationFilter {
    fn admits(self, location_type: LocationType) -> bool {
        match self {
            LocationFilter::Any => true,
            LocationFilter::Remote => location_type == LocationType::Remote,
            LocationFilter::Onsite => location_type == LocationType::Onsite,
            LocationFilter::Hybrid => location_type == LocationType::Hybrid,
        }
    }
}

impl FromStr for LocationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" | "" => Ok(LocationFilter::Any),
            "remote" | "remote_only" => Ok(LocationFilter::Remote),
            "onsite" | "onsite_only" | "on-site" => Ok(LocationFilter::Onsite),
            "hybrid" => Ok(LocationFilter::Hybrid),
            other => Err(format!(
                "unknown location filter '{other}' (expected any, remote, onsite or hybrid)"
            )),
        }
    }
}

/// Salary bands, evaluated against the posting's salary max.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SalaryBand {
    #[default]
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "under_100k")]
    Under100k,
    #[serde(rename = "100k_150k")]
    From100kTo150k,
    #[serde(rename = "over_150k")]
    Over150k,
}

impl SalaryBand {
    /// Postings without a salary only pass the `Any` band.
    fn admits(self, salary_max: Option<u32>) -> bool {
        match (self, salary_max) {
            (SalaryBand::Any, _) => true,
            (_, None) => false,
            (SalaryBand::Under100k, Some(max)) => max < 100_000,
            (SalaryBand::From100kTo150k, Some(max)) => (100_000..=150_000).contains(&max),
            (SalaryBand::Over150k, Some(max)) => max > 150_000,
        }
    }
}

impl FromStr for SalaryBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" | "" => Ok(SalaryBand::Any),
            "under_100k" => Ok(SalaryBand::Under100k),
            "100k_150k" => Ok(SalaryBand::From100kTo150k),
            "over_150k" => Ok(SalaryBand::Over150k),
            other => Err(format!(
                "unknown salary band '{other}' (expected any, under_100k, 100k_150k or over_150k)"
            )),
        }
    }
}

/// Validated filter criteria for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSpec {
    pub location: LocationFilter,
    pub experience: Option<ExperienceLevel>,
    pub salary: SalaryBand,
    pub max_per_category: Option<usize>,
}

impl FilterSpec {
    /// A job must satisfy every active filter.
    pub fn admits(&self, job: &JobRecord) -> bool {
        self.location.admits(job.location_type)
            && self
                .experience
                .map(|level| job.implied_level() == level)
                .unwrap_or(true)
            && self.salary.admits(job.salary_max())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("filters.location: {0}")]
    Location(String),

    #[error("filters.experience: {0}")]
    Experience(String),

    #[error("filters.salary: {0}")]
    Salary(String),
}

/// Filters exactly as the caller sent them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub max_per_category: Option<usize>,
}

impl FilterRequest {
    pub fn validate(self) -> Result<FilterSpec, FilterError> {
        let location = match self.location.as_deref() {
            None => LocationFilter::Any,
            Some(v) => v.parse().map_err(FilterError::Location)?,
        };

        let experience = match self.experience.as_deref().map(str::trim) {
            None | Some("") | Some("any") => None,
            Some(v) => Some(v.parse().map_err(FilterError::Experience)?),
        };

        let salary = match self.salary.as_deref() {
            None => SalaryBand::Any,
            Some(v) => v.parse().map_err(FilterError::Salary)?,
        };

        Ok(FilterSpec {
            location,
            experience,
            salary,
            max_per_category: self.max_per_category,
        })
    }
}

/// Removes jobs failing any filter from every category, then truncates to
/// `max_per_category`. Relative order is preserved.
pub fn apply_filters(mut categorized: CategorizedJobs, filters: &FilterSpec) -> CategorizedJobs {
    for jobs in categorized.values_mut() {
        jobs.retain(|scored| filters.admits(&scored.job));
        if let Some(limit) = filters.max_per_category {
            jobs.truncate(limit);
        }
    }
    categorized
}
