//! Deterministic `JobRecord` id assignment.
//!
//! `original_source/.../orchestrator.py` deduplicates on `job["id"]`, but
//! several scrapers never populate that field, so records silently drop or
//! double-count during dedup (spec.md §9). The fix: an id is assigned once,
//! here, at construction time — nothing downstream ever observes a
//! `JobRecord` without one, and nothing downstream mutates the id once set.

use crate::domain::{CompanyRecord, JobRecord};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

/// Hashes `(source, url)` when a URL is present, else `(source, title,
/// company.name)` — the fallback spec.md §9 mandates for records a backend
/// couldn't attach a URL to.
pub fn deterministic_id(source: &str, url: Option<&str>, title: &str, company: &str) -> String {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    source.hash(&mut hasher);
    match url {
        Some(url) => {
            0u8.hash(&mut hasher);
            url.hash(&mut hasher);
        }
        None => {
            1u8.hash(&mut hasher);
            title.hash(&mut hasher);
            company.hash(&mut hasher);
        }
    }
    format!("{:016x}", hasher.finish())
}

/// Builds a [`JobRecord`] with its id computed by [`deterministic_id`] —
/// the only constructor path that produces one, so an id can never be left
/// unset or supplied by a caller that got it wrong.
#[derive(Debug, Clone, Default)]
pub struct JobRecordBuilder {
    source: String,
    source_url: Option<String>,
    title: String,
    company: CompanyRecord,
    location: Option<String>,
    description: Option<String>,
    salary_min: Option<u64>,
    salary_max: Option<u64>,
    job_type: Option<String>,
    experience_level: Option<String>,
    remote_type: Option<String>,
    posted_at: Option<SystemTime>,
    skills: Vec<String>,
    metadata: HashMap<String, String>,
}

impl JobRecordBuilder {
    pub fn new(source: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn company(mut self, company: CompanyRecord) -> Self {
        self.company = company;
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn salary_range(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.salary_min = min;
        self.salary_max = max;
        self
    }

    pub fn job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }

    pub fn experience_level(mut self, level: impl Into<String>) -> Self {
        self.experience_level = Some(level.into());
        self
    }

    pub fn remote_type(mut self, remote_type: impl Into<String>) -> Self {
        self.remote_type = Some(remote_type.into());
        self
    }

    pub fn posted_at(mut self, posted_at: SystemTime) -> Self {
        self.posted_at = Some(posted_at);
        self
    }

    pub fn skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> JobRecord {
        let id = deterministic_id(
            &self.source,
            self.source_url.as_deref(),
            &self.title,
            &self.company.name,
        );
        JobRecord {
            id,
            source: self.source,
            source_url: self.source_url,
            title: self.title,
            company: self.company,
            location: self.location,
            description: self.description,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            job_type: self.job_type,
            experience_level: self.experience_level,
            remote_type: self.remote_type,
            posted_at: self.posted_at,
            skills: self.skills,
            metadata: self.metadata,
        }
    }
}
