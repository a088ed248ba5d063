//! Domain types shared by every crate in the control plane: [`Task`], the
//! output [`JobRecord`], and the closed [`BackendKind`]/[`Filters`] vocabulary
//! the orchestrator schedules against.
//!
//! None of these types know how a scrape happens — that's the
//! [`crate::events`]-observing, backend-owning crates' job. This module is
//! pure data.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The closed set of scraper backend families a task can be routed to.
///
/// Deliberately an enum, not a string tag (spec.md §3 names it as a tag but
/// §9 flags dynamic-typed dispatch as an anti-pattern) — every place the
/// source switched on a string here instead matches this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BackendKind {
    MeteredApi,
    Rss,
    Government,
    CompanyPage,
    BrowserDriven,
}

impl BackendKind {
    /// The "native" backend for a plain source tag, used by
    /// `select_backend`'s step 3 fallback (spec.md §4.7).
    pub fn native_for(source: &str) -> Option<Self> {
        match source {
            "metered_api" => Some(BackendKind::MeteredApi),
            "rss" => Some(BackendKind::Rss),
            "government" => Some(BackendKind::Government),
            "company_page" => Some(BackendKind::CompanyPage),
            "browser_driven" => Some(BackendKind::BrowserDriven),
            _ => None,
        }
    }
}

/// A requested date-posted window, one of the recognized `filters` options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DateWindow {
    PastDay,
    PastWeek,
    PastMonth,
    AnyTime,
}

/// Recognized filter options (spec.md §3). A struct, not a free-form map —
/// unknown fields in a wire-format filter object are a hard parse error
/// (`deny_unknown_fields`), per the dynamic-config redesign flag in §9.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields, default))]
pub struct Filters {
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub job_level: Option<String>,
    pub date_window: Option<DateWindow>,
    pub remote_only: bool,
    pub company_size: Option<String>,
    pub include_hidden_market: bool,
    pub max_pages: Option<u32>,
    pub user_profile: Option<String>,
}

impl Filters {
    /// Joins the recognized free-text signal fields into one query string,
    /// the shape `scrape-quota`'s high-value predicate and most backends'
    /// query builders consume.
    pub fn query_text(&self) -> String {
        let mut parts = self.keywords.clone();
        if let Some(level) = &self.job_level {
            parts.push(level.clone());
        }
        if let Some(loc) = &self.location {
            parts.push(loc.clone());
        }
        parts.join(" ")
    }
}

/// A task's current lifecycle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TaskStatus {
    Pending,
    InFlight,
    Completed,
    Failed,
    Cancelled,
}

/// A single scrape unit: one source, one filter set, optionally one URL.
///
/// Immutable except for the retry fields (`retry_count`) and the timestamp/
/// status/result fields a worker stamps as the task moves through its
/// lifecycle — spec.md §3 calls these out explicitly as the only mutable
/// surface.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub source: String,
    pub url: Option<String>,
    pub filters: Filters,
    pub priority: u8,
    pub created_at: SystemTime,
    pub scheduled_at: Option<SystemTime>,
    pub started_at: Option<SystemTime>,
    pub completed_at: Option<SystemTime>,
    pub retry_count: u32,
    pub max_retries: u32,
    pub status: TaskStatus,
    pub hybrid: bool,
    /// Populated on a terminal `Failed` transition (spec.md §3). `result`
    /// itself isn't mirrored here — the records a task produced travel to
    /// observers as a [`ScrapeOutcome`] payload on the worker's event
    /// channel instead of living on the task, since the orchestrator
    /// treats results opaquely past publication.
    pub error: Option<String>,
}

impl Task {
    /// Builds a new, freshly-created task at `pending`, priority clamped to
    /// the `1..=10` range spec.md §3 defines (1 = most urgent).
    pub fn new(id: impl Into<String>, source: impl Into<String>, priority: u8) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            url: None,
            filters: Filters::default(),
            priority: priority.clamp(1, 10),
            created_at: SystemTime::now(),
            scheduled_at: None,
            started_at: None,
            completed_at: None,
            retry_count: 0,
            max_retries: 3,
            status: TaskStatus::Pending,
            hybrid: false,
            error: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn hybrid(mut self) -> Self {
        self.hybrid = true;
        self
    }

    /// Whether this task has budget left for another retry attempt.
    pub fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }

    /// `select_backend` step 4: is `source` already wired to the metered
    /// API directly?
    pub fn is_metered(&self) -> bool {
        self.source == "metered_api"
    }
}

/// `{name, domain, size, industry}` — recovered from SPEC_FULL §3; spec.md
/// leaves `company` as an opaque `{…}` but two `JobRecord`s may reference the
/// same employer, so it is modeled once here.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompanyRecord {
    pub name: String,
    pub domain: Option<String>,
    pub size: Option<String>,
    pub industry: Option<String>,
}

/// The normalized output unit every backend produces and the orchestrator
/// treats opaquely except to deduplicate on `id` (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JobRecord {
    pub id: String,
    pub source: String,
    pub source_url: Option<String>,
    pub title: String,
    pub company: CompanyRecord,
    pub location: Option<String>,
    pub description: Option<String>,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub remote_type: Option<String>,
    pub posted_at: Option<SystemTime>,
    pub skills: Vec<String>,
    pub metadata: HashMap<String, String>,
}

/// What a backend is asked to do: a source tag, the recognized filters, and
/// an optional URL for page-shaped backends (spec.md §6 backend contract).
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub source_tag: String,
    pub filters: Filters,
    pub url: Option<String>,
    pub deadline: Duration,
}

/// What `ScraperContract::scrape` returns: zero or more normalized records,
/// optional company records it happened to extract, and free-form metadata.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOutcome {
    pub records: Vec<JobRecord>,
    pub companies: Vec<CompanyRecord>,
    pub meta: HashMap<String, String>,
}
