//! Curated JobRecord store.
//!
//! Loaded once at startup and read-only afterwards; shared across requests
//! as `Arc<JobStore>`. Pure data access, no scoring.
use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::listings::validation::validate_record;
use crate::models::job::normalize_terms;
use crate::models::{
    CompanySize, ExperienceLevel, JobRecord, JobSource, LocationType, SalaryRange,
};

const BUNDLED_DATASET: &str = include_str!("../../data/curated_jobs.json");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct JobStore {
    records: Vec<JobRecord>,
    by_id: HashMap<String, usize>,
}

/// Curated rows carry no `source`; every record in the dataset is curated.
#[derive(Debug, Deserialize)]
struct CuratedRow {
    id: String,
    title: String,
    company: String,
    company_size: CompanySize,
    #[serde(default)]
    required_skills: Vec<String>,
    location: String,
    location_type: LocationType,
    #[serde(default)]
    salary_range: Option<SalaryRange>,
    application_url: String,
    #[serde(default)]
    experience_level: Option<ExperienceLevel>,
}

impl From<CuratedRow> for JobRecord {
    fn from(row: CuratedRow) -> Self {
        JobRecord {
            id: row.id,
            title: row.title,
            company: row.company,
            company_size: row.company_size,
            required_skills: normalize_terms(&row.required_skills),
            location: row.location,
            location_type: row.location_type,
            salary_range: row.salary_range,
            application_url: row.application_url,
            source: JobSource::Curated,
            experience_level: row.experience_level,
        }
    }
}

impl JobStore {
    /// Builds a store from already-parsed records, dropping any that fail
    /// validation or reuse an id.
    pub fn from_records(records: impl IntoIterator<Item = JobRecord>) -> Self {
        let mut store = JobStore::default();

        for record in records {
            if let Err(e) = validate_record(&record) {
                warn!(record_id = %record.id, error = %e, "Dropping invalid curated record");
                continue;
            }
            if store.by_id.contains_key(&record.id) {
                warn!(record_id = %record.id, "Dropping curated record with duplicate id");
                continue;
            }
            store.by_id.insert(record.id.clone(), store.records.len());
            store.records.push(record);
        }

        store
    }

    /// Parses a JSON array of curated rows.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let rows: Vec<CuratedRow> = serde_json::from_str(json)?;
        Ok(Self::from_records(rows.into_iter().map(JobRecord::from)))
    }

    /// Loads the dataset at `path`, or the bundled dataset when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, StoreError> {
        let store = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_json(&json)?
            }
            None => Self::from_json(BUNDLED_DATASET)?,
        };

        info!(
            "Curated store loaded: {} records ({})",
            store.len(),
            path.map(|p| p.display().to_string())
                .unwrap_or_else(|| "bundled dataset".to_string())
        );
        Ok(store)
    }

    pub fn all(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&JobRecord> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::fixtures::job;

    #[test]
    fn test_bundled_dataset_loads_clean() {
        let store = JobStore::load(None).unwrap();
        assert!(!store.is_empty());
        // every bundled row must survive validation
        let raw: Vec<serde_json::Value> = serde_json::from_str(BUNDLED_DATASET).unwrap();
        assert_eq!(store.len(), raw.len());
        assert!(store.all().iter().all(|j| j.source == JobSource::Curated));
    }

    #[test]
    fn test_invalid_and_duplicate_records_dropped() {
        let mut search_link = job("b", "Engineer");
        search_link.application_url = "https://www.indeed.com/jobs?q=engineer".to_string();

        let store = JobStore::from_records(vec![
            job("a", "Engineer"),
            search_link,
            job("a", "Another Engineer"),
            job("c", "Designer"),
        ]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().title, "Engineer");
        assert!(store.get("b").is_none());
        assert!(store.get("c").is_some());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{
                "id": "cur-1",
                "title": "Platform Engineer",
                "company": "Acme",
                "company_size": "large",
                "required_skills": ["Rust", "AWS"],
                "location": "Remote",
                "location_type": "remote",
                "salary_range": {{"min": 120000, "max": 160000}},
                "application_url": "https://acme.com/careers/platform-engineer"
            }}]"#
        )
        .unwrap();

        let store = JobStore::load(Some(file.path())).unwrap();
        let record = store.get("cur-1").unwrap();
        assert_eq!(record.source, JobSource::Curated);
        assert!(record.required_skills.contains("rust"));
        assert_eq!(record.salary_max(), Some(160_000));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = JobStore::load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            JobStore::from_json("{not json"),
            Err(StoreError::Parse(_))
        ));
    }
}
