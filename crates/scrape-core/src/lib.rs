//! Shared domain types, error taxonomy, and event plumbing for the scrape
//! control plane.
//!
//! This crate has no opinion about how tasks get scheduled or how backends
//! scrape — it only defines the vocabulary every other crate in the
//! workspace shares: [`Task`], [`JobRecord`], the [`ScrapeError`] kinds, and
//! the listener machinery used to observe lifecycle events without coupling
//! observers to emitters.

pub mod domain;
pub mod error;
pub mod events;
pub mod health_trigger;
pub mod job_record;

pub use domain::{
    BackendKind, CompanyRecord, DateWindow, Filters, JobRecord, ScrapeOutcome, ScrapeRequest,
    Task, TaskStatus,
};
pub use error::ScrapeError;
pub use events::{EventListener, EventListeners, FnListener, ScrapeEvent};
pub use health_trigger::{HealthTriggerable, SharedHealthTrigger, TriggerHealth};
