//! Record validation at the data boundary.
//!
//! Every record, curated or fetched, passes through here before it can be
//! scored. The defining check is on `application_url`: it must be a direct
//! link to a posting or a career page. Search-result URLs are rejected
//! because they are the links that go stale or get region-blocked.

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::job::normalize_terms;
use crate::models::{CompanySize, ExperienceLevel, JobRecord, JobSource, LocationType, SalaryRange};

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("application_url '{url}' is not a usable link: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("application_url '{0}' is a search query, not a direct posting")]
    SearchQueryUrl(String),

    #[error("salary range is inverted ({min} > {max})")]
    SalaryInverted { min: u32, max: u32 },

    #[error("unrecognised {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },
}

/// Path segments that mark a job-board search results page.
const SEARCH_PATH_SEGMENTS: &[&str] = &[
    "search",
    "jobsearch",
    "job-search",
    "find-jobs",
    "results",
];

/// Query keys that carry a free-text search rather than a posting identifier.
/// Single-letter keys other than `q` are left out: career sites use `l` and
/// `k` for language and tracking on direct postings.
const SEARCH_QUERY_KEYS: &[&str] = &[
    "q", "query", "keywords", "keyword", "sc.keyword", "search", "what", "where",
];

/// Checks that a URL points at a specific posting or career page.
///
/// PASS: absolute http(s) URL with a host, e.g.
/// `https://boards.greenhouse.io/acme/jobs/123?gh_jid=123`.
///
/// FAIL:
/// - unparseable, relative, or non-http(s) URLs
/// - any path segment naming a search page (`/jobs/search`, `/results`)
/// - any free-text search parameter (`?q=`, `?keywords=`)
pub fn check_application_url(raw: &str) -> Result<(), RecordError> {
    let url = Url::parse(raw.trim()).map_err(|e| RecordError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(RecordError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if url.host_str().map(str::is_empty).unwrap_or(true) {
        return Err(RecordError::InvalidUrl {
            url: raw.to_string(),
            reason: "no host".to_string(),
        });
    }

    let search_path = url
        .path_segments()
        .map(|mut segments| {
            segments.any(|s| SEARCH_PATH_SEGMENTS.contains(&s.to_lowercase().as_str()))
        })
        .unwrap_or(false);

    let search_query = url
        .query_pairs()
        .any(|(key, _)| SEARCH_QUERY_KEYS.contains(&key.to_lowercase().as_str()));

    if search_path || search_query {
        return Err(RecordError::SearchQueryUrl(raw.to_string()));
    }

    Ok(())
}

/// Checks required fields, salary ordering and the application link of a record.
pub fn validate_record(record: &JobRecord) -> Result<(), RecordError> {
    if record.id.trim().is_empty() {
        return Err(RecordError::MissingField("id"));
    }
    if record.title.trim().is_empty() {
        return Err(RecordError::MissingField("title"));
    }
    if record.company.trim().is_empty() {
        return Err(RecordError::MissingField("company"));
    }
    if record.application_url.trim().is_empty() {
        return Err(RecordError::MissingField("application_url"));
    }
    check_application_url(&record.application_url)?;

    if let Some(range) = record.salary_range {
        if range.min > range.max {
            return Err(RecordError::SalaryInverted {
                min: range.min,
                max: range.max,
            });
        }
    }

    Ok(())
}

/// A listing as returned by the remote provider. Providers disagree on field
/// names and omit fields freely, so everything is optional here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawListing {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default, alias = "tags", alias = "required_skills")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_type: Option<String>,
    #[serde(default)]
    pub remote: Option<bool>,
    #[serde(default)]
    pub salary_min: Option<u32>,
    #[serde(default)]
    pub salary_max: Option<u32>,
    #[serde(default, alias = "application_url", alias = "apply_url")]
    pub url: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RecordError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(RecordError::MissingField(field))
}

/// Maps a provider listing into a `JobRecord` and validates it.
pub fn into_job_record(raw: RawListing) -> Result<JobRecord, RecordError> {
    let title = required(raw.title, "title")?;
    let company = required(raw.company, "company")?;
    let application_url = required(raw.url, "url")?;

    let company_size = match raw.company_size.as_deref() {
        None => CompanySize::Medium,
        Some(value) => value.parse().map_err(|_| RecordError::UnknownValue {
            field: "company_size",
            value: value.to_string(),
        })?,
    };

    let location = raw
        .location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| "Unspecified".to_string());

    let location_type = match raw.location_type.as_deref() {
        Some(value) => value.parse().map_err(|_| RecordError::UnknownValue {
            field: "location_type",
            value: value.to_string(),
        })?,
        None if raw.remote == Some(true) => LocationType::Remote,
        None if location.to_lowercase().contains("remote") => LocationType::Remote,
        None => LocationType::Onsite,
    };

    let salary_range = match (raw.salary_min, raw.salary_max) {
        (Some(min), Some(max)) => Some(SalaryRange { min, max }),
        (Some(only), None) | (None, Some(only)) => Some(SalaryRange {
            min: only,
            max: only,
        }),
        (None, None) => None,
    };

    let experience_level = match raw.experience_level.as_deref() {
        None => None,
        Some(value) => Some(value.parse::<ExperienceLevel>().map_err(|_| {
            RecordError::UnknownValue {
                field: "experience_level",
                value: value.to_string(),
            }
        })?),
    };

    // Remote ids are namespaced so they can never collide with curated ones.
    let id = match raw.id.map(|i| i.trim().to_string()).filter(|i| !i.is_empty()) {
        Some(id) => format!("remote-{id}"),
        None => format!(
            "remote-{}",
            Uuid::new_v5(&Uuid::NAMESPACE_URL, application_url.as_bytes())
        ),
    };

    let record = JobRecord {
        id,
        title,
        company,
        company_size,
        required_skills: normalize_terms(&raw.skills),
        location,
        location_type,
        salary_range,
        application_url,
        source: JobSource::Remote,
        experience_level,
    };

    validate_record(&record)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::job;

    fn raw(url: &str) -> RawListing {
        RawListing {
            id: Some("42".to_string()),
            title: Some("Backend Engineer".to_string()),
            company: Some("Acme".to_string()),
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_pass_direct_posting() {
        assert!(check_application_url("https://jobs.lever.co/acme/5f1c-44a2").is_ok());
    }

    #[test]
    fn test_pass_career_page() {
        assert!(check_application_url("https://www.acme.com/careers").is_ok());
    }

    #[test]
    fn test_pass_posting_id_parameter() {
        assert!(check_application_url("https://boards.greenhouse.io/acme/jobs/123?gh_jid=123").is_ok());
    }

    #[test]
    fn test_fail_query_string_search() {
        let err = check_application_url("https://www.indeed.com/jobs?q=rust+developer").unwrap_err();
        assert!(matches!(err, RecordError::SearchQueryUrl(_)));
    }

    #[test]
    fn test_fail_search_path() {
        assert!(matches!(
            check_application_url("https://www.linkedin.com/jobs/search/?currentJobId=1"),
            Err(RecordError::SearchQueryUrl(_))
        ));
    }

    #[test]
    fn test_pass_language_and_tracking_parameters() {
        assert!(check_application_url("https://acme.com/careers/123?l=en").is_ok());
        assert!(check_application_url("https://jobs.acme.io/postings/9?k=ref-linkedin").is_ok());
    }

    #[test]
    fn test_fail_keywords_parameter() {
        assert!(check_application_url("https://example.com/careers?Keywords=react").is_err());
    }

    #[test]
    fn test_fail_relative_url() {
        assert!(matches!(
            check_application_url("/jobs/123"),
            Err(RecordError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_fail_non_http_scheme() {
        assert!(matches!(
            check_application_url("mailto:jobs@acme.com"),
            Err(RecordError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_validate_record_requires_title() {
        let mut record = job("a", "Engineer");
        record.title = "  ".to_string();
        assert_eq!(validate_record(&record), Err(RecordError::MissingField("title")));
    }

    #[test]
    fn test_validate_record_rejects_inverted_salary() {
        let mut record = job("a", "Engineer");
        record.salary_range = Some(SalaryRange { min: 90_000, max: 50_000 });
        assert!(matches!(
            validate_record(&record),
            Err(RecordError::SalaryInverted { .. })
        ));
    }

    #[test]
    fn test_into_job_record_maps_fields() {
        let mut listing = raw("https://jobs.acme.io/postings/42");
        listing.skills = vec!["Rust".to_string(), "Tokio".to_string()];
        listing.remote = Some(true);
        listing.salary_min = Some(100_000);
        listing.salary_max = Some(140_000);
        listing.company_size = Some("startup".to_string());

        let record = into_job_record(listing).unwrap();
        assert_eq!(record.id, "remote-42");
        assert_eq!(record.source, JobSource::Remote);
        assert_eq!(record.location_type, LocationType::Remote);
        assert_eq!(record.company_size, CompanySize::Startup);
        assert!(record.required_skills.contains("rust"));
        assert_eq!(record.salary_range, Some(SalaryRange { min: 100_000, max: 140_000 }));
    }

    #[test]
    fn test_into_job_record_rejects_search_url() {
        let listing = raw("https://www.glassdoor.com/Job/jobs.htm?sc.keyword=rust&k=rust");
        assert!(matches!(
            into_job_record(listing),
            Err(RecordError::SearchQueryUrl(_))
        ));
    }

    #[test]
    fn test_into_job_record_requires_url() {
        let mut listing = raw("");
        listing.url = None;
        assert_eq!(into_job_record(listing), Err(RecordError::MissingField("url")));
    }

    #[test]
    fn test_missing_id_gets_stable_derived_id() {
        let mut a = raw("https://jobs.acme.io/postings/7");
        a.id = None;
        let b = a.clone();
        let first = into_job_record(a).unwrap();
        let second = into_job_record(b).unwrap();
        assert!(first.id.starts_with("remote-"));
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_location_text_implies_remote() {
        let mut listing = raw("https://jobs.acme.io/postings/9");
        listing.location = Some("Remote (EU)".to_string());
        assert_eq!(into_job_record(listing).unwrap().location_type, LocationType::Remote);
    }

    #[test]
    fn test_unknown_company_size_rejected() {
        let mut listing = raw("https://jobs.acme.io/postings/9");
        listing.company_size = Some("gigantic".to_string());
        assert!(matches!(
            into_job_record(listing),
            Err(RecordError::UnknownValue { field: "company_size", .. })
        ));
    }
}
