use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Seniority band shared by candidate profiles and job postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
}

impl ExperienceLevel {
    /// Position on the entry → mid → senior ladder.
    pub fn rank(self) -> u8 {
        match self {
            ExperienceLevel::Entry => 0,
            ExperienceLevel::Mid => 1,
            ExperienceLevel::Senior => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            other => Err(format!(
                "unknown experience level '{other}' (expected entry, mid or senior)"
            )),
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanySize {
    Startup,
    Medium,
    Large,
}

impl CompanySize {
    pub fn as_str(self) -> &'static str {
        match self {
            CompanySize::Startup => "startup",
            CompanySize::Medium => "medium",
            CompanySize::Large => "large",
        }
    }
}

impl FromStr for CompanySize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "startup" => Ok(CompanySize::Startup),
            "medium" => Ok(CompanySize::Medium),
            "large" => Ok(CompanySize::Large),
            other => Err(format!("unknown company size '{other}'")),
        }
    }
}

/// Where the work happens for a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Remote,
    Onsite,
    Hybrid,
}

impl LocationType {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Remote => "remote",
            LocationType::Onsite => "onsite",
            LocationType::Hybrid => "hybrid",
        }
    }
}

impl FromStr for LocationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(LocationType::Remote),
            "onsite" | "on-site" | "office" => Ok(LocationType::Onsite),
            "hybrid" => Ok(LocationType::Hybrid),
            other => Err(format!("unknown location type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSource {
    Curated,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
}

/// A single posting, curated or remote, normalized to a common shape.
///
/// Records only reach the matching pipeline after passing
/// `listings::validation::validate_record`, so `application_url` always
/// points at a concrete posting or a company career page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub company: String,
    pub company_size: CompanySize,
    #[serde(default)]
    pub required_skills: BTreeSet<String>,
    pub location: String,
    pub location_type: LocationType,
    #[serde(default)]
    pub salary_range: Option<SalaryRange>,
    pub application_url: String,
    pub source: JobSource,
    /// Explicit seniority when the source states it; otherwise inferred from the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
}

const SENIOR_MARKERS: &[&str] = &["senior", "sr", "lead", "principal", "staff"];
const ENTRY_MARKERS: &[&str] = &["junior", "jr", "entry", "intern", "graduate", "associate"];

impl JobRecord {
    /// Seniority the posting targets.
    pub fn implied_level(&self) -> ExperienceLevel {
        if let Some(level) = self.experience_level {
            return level;
        }
        let title = self.title.to_lowercase();
        let words: Vec<&str> = title
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        if words.iter().any(|w| SENIOR_MARKERS.contains(w)) {
            ExperienceLevel::Senior
        } else if words.iter().any(|w| ENTRY_MARKERS.contains(w)) {
            ExperienceLevel::Entry
        } else {
            ExperienceLevel::Mid
        }
    }

    pub fn salary_max(&self) -> Option<u32> {
        self.salary_range.map(|r| r.max)
    }
}

/// Lowercases, trims and drops blank entries.
pub fn normalize_terms<I, S>(terms: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::job;

    #[test]
    fn test_title_markers_imply_level() {
        assert_eq!(job("a", "Senior Rust Engineer").implied_level(), ExperienceLevel::Senior);
        assert_eq!(job("b", "Sr. Backend Developer").implied_level(), ExperienceLevel::Senior);
        assert_eq!(job("c", "Junior QA Analyst").implied_level(), ExperienceLevel::Entry);
        assert_eq!(job("d", "Graduate Data Engineer").implied_level(), ExperienceLevel::Entry);
        assert_eq!(job("e", "Frontend Developer").implied_level(), ExperienceLevel::Mid);
    }

    #[test]
    fn test_marker_must_be_whole_word() {
        // "staffing" and "leader" must not trip the senior markers
        assert_eq!(job("a", "Staffing Coordinator").implied_level(), ExperienceLevel::Mid);
        assert_eq!(job("b", "Team Leadership Analyst").implied_level(), ExperienceLevel::Mid);
    }

    #[test]
    fn test_explicit_level_wins_over_title() {
        let mut j = job("a", "Senior Platform Engineer");
        j.experience_level = Some(ExperienceLevel::Entry);
        assert_eq!(j.implied_level(), ExperienceLevel::Entry);
    }

    #[test]
    fn test_normalize_terms() {
        let set = normalize_terms(["  React ", "CSS", "", "react"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("react"));
        assert!(set.contains("css"));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Senior".parse::<ExperienceLevel>(), Ok(ExperienceLevel::Senior));
        assert!("expert".parse::<ExperienceLevel>().is_err());
        assert_eq!("on-site".parse::<LocationType>(), Ok(LocationType::Onsite));
        assert_eq!("LARGE".parse::<CompanySize>(), Ok(CompanySize::Large));
    }
}
