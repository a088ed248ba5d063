//! Lifecycle events emitted by [`crate::QuotaLedger`].

use scrape_core::events::ScrapeEvent;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum QuotaEvent {
    Admitted { remaining: u32, calls_today: u32 },
    Rejected { reason: &'static str },
    MonthRolledOver { month: u32, year: i32, daily_limit: u32 },
}

impl ScrapeEvent for QuotaEvent {
    fn event_type(&self) -> &'static str {
        match self {
            QuotaEvent::Admitted { .. } => "admitted",
            QuotaEvent::Rejected { .. } => "rejected",
            QuotaEvent::MonthRolledOver { .. } => "month_rolled_over",
        }
    }

    fn timestamp(&self) -> Instant {
        Instant::now()
    }

    fn pattern_name(&self) -> &str {
        "metered-api-quota"
    }
}
