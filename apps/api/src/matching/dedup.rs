use std::collections::HashSet;

use tracing::debug;

use crate::models::JobRecord;

/// Identity of a posting across sources: lowercased, trimmed, whitespace-collapsed
/// `(company, title)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostingKey {
    pub company: String,
    pub title: String,
}

impl PostingKey {
    pub fn of(job: &JobRecord) -> Self {
        Self {
            company: normalize(&job.company),
            title: normalize(&job.title),
        }
    }
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub jobs: Vec<JobRecord>,
    pub curated_kept: usize,
    pub remote_kept: usize,
    pub duplicates_dropped: usize,
}

/// Merges curated and remote records. Curated records come first in store
/// order and win every key conflict, so their `application_url` is the one
/// that survives. The first occurrence of a key within a source wins.
pub fn merge_sources(curated: &[JobRecord], remote: Vec<JobRecord>) -> MergeOutcome {
    let mut seen: HashSet<PostingKey> = HashSet::new();
    let mut outcome = MergeOutcome::default();

    for job in curated {
        if seen.insert(PostingKey::of(job)) {
            outcome.jobs.push(job.clone());
            outcome.curated_kept += 1;
        } else {
            outcome.duplicates_dropped += 1;
        }
    }

    for job in remote {
        let key = PostingKey::of(&job);
        if seen.contains(&key) {
            debug!(
                remote_id = %job.id,
                company = %key.company,
                title = %key.title,
                "Dropping remote duplicate of an existing posting"
            );
            outcome.duplicates_dropped += 1;
            continue;
        }
        seen.insert(key);
        outcome.jobs.push(job);
        outcome.remote_kept += 1;
    }

    outcome
}
