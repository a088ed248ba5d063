//! Monthly/daily/hourly quota guard for the metered search backend (C3).
//!
//! Gates every call to the one paid search backend behind three nested
//! budgets, with automatic monthly rollover and high-value-query gating
//! under free-tier mode (spec.md §4.3). [`ledger::QuotaLedger::try_acquire`]
//! is the single admission-and-debit point — the bug this crate exists to
//! close is the source's two independent decrement sites for the same
//! counters.
//!
//! ## Example
//!
//! ```
//! # use scrape_quota::{QuotaConfig, QuotaLedger, settings_store::NullStore};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let ledger = QuotaLedger::new(QuotaConfig::default(), Box::new(NullStore));
//! if ledger.try_acquire("site:linkedin.com/jobs engineer").await.is_ok() {
//!     // ... call the metered backend ...
//! }
//! # }
//! ```

mod config;
mod events;
mod high_value;
mod ledger;
pub mod settings_store;

pub use config::QuotaConfig;
pub use events::QuotaEvent;
pub use high_value::{is_high_value, HighValueSignal};
pub use ledger::{LedgerState, QuotaLedger};
