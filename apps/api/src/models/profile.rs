use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Number;
use thiserror::Error;

use crate::models::job::{normalize_terms, ExperienceLevel, LocationType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPreference {
    Remote,
    Onsite,
    Any,
}

impl LocationPreference {
    pub fn accepts(self, location_type: LocationType) -> bool {
        match self {
            LocationPreference::Any => true,
            LocationPreference::Remote => location_type == LocationType::Remote,
            LocationPreference::Onsite => location_type == LocationType::Onsite,
        }
    }
}

impl FromStr for LocationPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(LocationPreference::Remote),
            "onsite" | "on-site" => Ok(LocationPreference::Onsite),
            "any" => Ok(LocationPreference::Any),
            other => Err(format!(
                "unknown location preference '{other}' (expected remote, onsite or any)"
            )),
        }
    }
}

/// A job seeker's skills and preferences. Immutable for the duration of a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub skills: BTreeSet<String>,
    pub experience_level: ExperienceLevel,
    pub preferred_location_type: LocationPreference,
    pub min_salary: Option<u32>,
    pub culture_preferences: BTreeSet<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("experience_level: {0}")]
    ExperienceLevel(String),

    #[error("preferred_location_type: {0}")]
    LocationPreference(String),

    #[error("min_salary must be a whole number between 0 and {max}, got {value}", max = u32::MAX)]
    MinSalary { value: String },
}

/// Profile exactly as the caller sent it. Converted into a `CandidateProfile`
/// by `validate` before any scoring work starts. Fields are kept loose so
/// that a missing level or a fractional salary surfaces as a `ProfileError`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default = "default_location_preference")]
    pub preferred_location_type: String,
    #[serde(default)]
    pub min_salary: Option<Number>,
    #[serde(default)]
    pub culture_preferences: Vec<String>,
}

fn default_location_preference() -> String {
    "any".to_string()
}

impl ProfileRequest {
    pub fn validate(self) -> Result<CandidateProfile, ProfileError> {
        let experience_level = self
            .experience_level
            .ok_or_else(|| ProfileError::ExperienceLevel("is required".to_string()))?
            .parse::<ExperienceLevel>()
            .map_err(ProfileError::ExperienceLevel)?;

        let preferred_location_type = self
            .preferred_location_type
            .parse::<LocationPreference>()
            .map_err(ProfileError::LocationPreference)?;

        let min_salary = match self.min_salary {
            None => None,
            Some(value) => Some(
                value
                    .as_u64()
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| ProfileError::MinSalary {
                        value: value.to_string(),
                    })?,
            ),
        };

        Ok(CandidateProfile {
            skills: normalize_terms(&self.skills),
            experience_level,
            preferred_location_type,
            min_salary,
            culture_preferences: normalize_terms(&self.culture_preferences),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(level: &str) -> ProfileRequest {
        ProfileRequest {
            skills: vec!["React".to_string(), " css ".to_string()],
            experience_level: Some(level.to_string()),
            preferred_location_type: "remote".to_string(),
            min_salary: Some(Number::from(100_000)),
            culture_preferences: vec!["Fast-Paced".to_string()],
        }
    }

    #[test]
    fn test_valid_profile_is_normalized() {
        let profile = request("mid").validate().unwrap();
        assert_eq!(profile.experience_level, ExperienceLevel::Mid);
        assert_eq!(profile.preferred_location_type, LocationPreference::Remote);
        assert!(profile.skills.contains("react"));
        assert!(profile.skills.contains("css"));
        assert!(profile.culture_preferences.contains("fast-paced"));
        assert_eq!(profile.min_salary, Some(100_000));
    }

    #[test]
    fn test_malformed_experience_level_rejected() {
        let err = request("wizard").validate().unwrap_err();
        assert!(matches!(err, ProfileError::ExperienceLevel(_)));
        assert!(err.to_string().contains("wizard"));
    }

    #[test]
    fn test_hybrid_is_not_a_preference() {
        let mut req = request("mid");
        req.preferred_location_type = "hybrid".to_string();
        assert!(matches!(
            req.validate(),
            Err(ProfileError::LocationPreference(_))
        ));
    }

    #[test]
    fn test_negative_min_salary_rejected() {
        let mut req = request("senior");
        req.min_salary = Some(Number::from(-5));
        assert_eq!(
            req.validate(),
            Err(ProfileError::MinSalary {
                value: "-5".to_string()
            })
        );
    }

    #[test]
    fn test_missing_experience_level_rejected() {
        let mut req = request("mid");
        req.experience_level = None;
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "experience_level: is required");
    }

    #[test]
    fn test_fractional_and_oversized_min_salary_rejected() {
        let req: ProfileRequest = serde_json::from_value(serde_json::json!({
            "experience_level": "mid",
            "min_salary": 95000.5
        }))
        .unwrap();
        assert!(matches!(req.validate(), Err(ProfileError::MinSalary { .. })));

        let mut req = request("mid");
        req.min_salary = Some(Number::from(5_000_000_000u64));
        assert!(matches!(req.validate(), Err(ProfileError::MinSalary { .. })));
    }

    #[test]
    fn test_any_accepts_every_location_type() {
        for lt in [LocationType::Remote, LocationType::Onsite, LocationType::Hybrid] {
            assert!(LocationPreference::Any.accepts(lt));
        }
        assert!(!LocationPreference::Onsite.accepts(LocationType::Hybrid));
    }
}
