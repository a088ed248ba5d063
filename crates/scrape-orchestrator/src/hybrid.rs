//! Hybrid-task merge (spec.md §4.7): metered_api runs first for breadth,
//! then the native backend on the same URL for depth; results union by
//! `id`, first-writer-wins per scalar field, arrays union-merge.
//!
//! Grounded directly on `original_source/.../orchestrator.py`'s
//! `_execute_hybrid_task`, which the design names explicitly as the
//! pattern to re-implement with a deterministic `id` already assigned
//! (`scrape_core::job_record::deterministic_id`) rather than the source's
//! `job["id"]`-or-drop dedup.

use scrape_core::{JobRecord, ScrapeOutcome};

/// Merges `depth` (the native-backend pass) into `primary` (the metered
/// pass that ran first). Records present in both (matched by `id`) keep
/// `primary`'s scalar fields and union their `skills`; records only in
/// `depth` are appended as-is.
pub fn merge(primary: ScrapeOutcome, depth: ScrapeOutcome) -> ScrapeOutcome {
    let mut by_id: Vec<JobRecord> = primary.records;

    for record in depth.records {
        match by_id.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => merge_record(existing, record),
            None => by_id.push(record),
        }
    }

    let mut companies = primary.companies;
    for company in depth.companies {
        if !companies.iter().any(|c| c.name == company.name) {
            companies.push(company);
        }
    }

    let mut meta = primary.meta;
    for (key, value) in depth.meta {
        meta.entry(key).or_insert(value);
    }

    ScrapeOutcome {
        records: by_id,
        companies,
        meta,
    }
}

/// First-writer-wins per scalar field (`existing` is the metered/primary
/// pass and already holds its values); `skills` is the one array field
/// `JobRecord` carries, so it union-merges.
fn merge_record(existing: &mut JobRecord, incoming: JobRecord) {
    if existing.description.is_none() {
        existing.description = incoming.description;
    }
    if existing.salary_min.is_none() {
        existing.salary_min = incoming.salary_min;
    }
    if existing.salary_max.is_none() {
        existing.salary_max = incoming.salary_max;
    }
    if existing.job_type.is_none() {
        existing.job_type = incoming.job_type;
    }
    if existing.experience_level.is_none() {
        existing.experience_level = incoming.experience_level;
    }
    if existing.remote_type.is_none() {
        existing.remote_type = incoming.remote_type;
    }
    for skill in incoming.skills {
        if !existing.skills.contains(&skill) {
            existing.skills.push(skill);
        }
    }
    for (key, value) in incoming.metadata {
        existing.metadata.entry(key).or_insert(value);
    }
}
