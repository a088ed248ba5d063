//! Cooperative worker set (C6, spec.md §4.6) that drains C5's priority
//! queue, dispatching each task through a pluggable [`TaskHandler`] rather
//! than calling back into the orchestrator directly — keeping the
//! worker<->orchestrator relationship a one-way message flow over
//! [`WorkerEvent`], per spec.md §9's cyclic-reference redesign flag.

mod events;
mod handler;
mod set;
mod worker;

pub use events::WorkerEvent;
pub use handler::TaskHandler;
pub use set::WorkerSet;
pub use worker::InFlightMap;
