//! Single-writer quota ledger (C3, spec.md §4.3).
//!
//! `original_source/.../serpapi_scraper.py` decrements `remaining_quota`
//! at two independent call sites (the Google Jobs path and the organic
//! search path) and checks the month boundary unsynchronized against
//! concurrent callers. [`QuotaLedger::try_acquire`] is the single
//! admission-and-debit point; everything else in this crate is read-only
//! with respect to the counters.

use crate::config::QuotaConfig;
use crate::events::QuotaEvent;
use crate::high_value::is_high_value;
use crate::settings_store::{QuotaSnapshot, SettingsStore};
use chrono::{Datelike, NaiveDate, Timelike, Utc};
use scrape_core::events::EventListeners;
use scrape_core::error::QuotaExhaustedReason;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    pub used_this_month: u32,
    pub remaining: u32,
    pub daily_limit: u32,
    pub hourly_limit: u32,
    pub calls_today: u32,
    pub calls_this_hour: u32,
    pub last_hourly_reset_hour: u32,
    pub last_daily_reset_date: NaiveDate,
    pub last_month_reset_month: u32,
    pub last_month_reset_year: i32,
}

impl LedgerState {
    fn fresh(config: &QuotaConfig) -> Self {
        let now = Utc::now();
        let mut state = Self {
            used_this_month: 0,
            remaining: config.monthly_quota,
            daily_limit: 1,
            hourly_limit: 1,
            calls_today: 0,
            calls_this_hour: 0,
            last_hourly_reset_hour: now.hour(),
            last_daily_reset_date: now.date_naive(),
            last_month_reset_month: now.month(),
            last_month_reset_year: now.year(),
        };
        state.recompute_daily_limit(config, now.date_naive());
        state
    }

    fn from_snapshot(snapshot: QuotaSnapshot) -> Self {
        Self {
            used_this_month: snapshot.used_this_month,
            remaining: snapshot.remaining,
            daily_limit: snapshot.daily_limit,
            hourly_limit: snapshot.hourly_limit,
            calls_today: snapshot.calls_today,
            calls_this_hour: snapshot.calls_this_hour,
            last_hourly_reset_hour: snapshot.last_hourly_reset_hour,
            last_daily_reset_date: snapshot.last_daily_reset_date,
            last_month_reset_month: snapshot.last_month_reset_month,
            last_month_reset_year: snapshot.last_month_reset_year,
        }
    }

    fn to_snapshot(&self) -> QuotaSnapshot {
        QuotaSnapshot {
            used_this_month: self.used_this_month,
            remaining: self.remaining,
            daily_limit: self.daily_limit,
            hourly_limit: self.hourly_limit,
            calls_today: self.calls_today,
            calls_this_hour: self.calls_this_hour,
            last_hourly_reset_hour: self.last_hourly_reset_hour,
            last_daily_reset_date: self.last_daily_reset_date,
            last_month_reset_month: self.last_month_reset_month,
            last_month_reset_year: self.last_month_reset_year,
        }
    }

    /// spec.md §4.3's dynamic daily-limit formula.
    fn recompute_daily_limit(&mut self, config: &QuotaConfig, today: NaiveDate) {
        let days_in_month = days_in_month(today.year(), today.month());
        let days_remaining = (days_in_month - today.day() + 1).max(1);
        let daily_budget = (self.remaining as f64 / days_remaining as f64) * config.daily_safety_factor;
        self.daily_limit = (daily_budget.floor() as u32).max(1);
        self.hourly_limit = (self.daily_limit / 24).max(1);
    }

    /// Steps 1-3 of `tryAcquire` (spec.md §4.3): detect and apply the
    /// month/day/hour rollovers. Returns `Some` with the new month/year if
    /// a month transition happened, for the caller to emit an event.
    fn apply_rollovers(&mut self, config: &QuotaConfig) -> Option<(u32, i32)> {
        let now = Utc::now();
        let mut month_rolled = None;

        if now.month() != self.last_month_reset_month || now.year() != self.last_month_reset_year {
            self.used_this_month = 0;
            self.remaining = config.monthly_quota;
            self.calls_today = 0;
            self.calls_this_hour = 0;
            self.last_month_reset_month = now.month();
            self.last_month_reset_year = now.year();
            self.last_daily_reset_date = now.date_naive();
            self.last_hourly_reset_hour = now.hour();
            self.recompute_daily_limit(config, now.date_naive());
            month_rolled = Some((now.month(), now.year()));
        }

        if now.date_naive() != self.last_daily_reset_date {
            self.calls_today = 0;
            self.last_daily_reset_date = now.date_naive();
        }

        if now.hour() != self.last_hourly_reset_hour {
            self.calls_this_hour = 0;
            self.last_hourly_reset_hour = now.hour();
        }

        month_rolled
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let this_month_start = NaiveDate::from_ymd_opt(year, month, 1).expect("valid calendar month");
    next_month
        .expect("valid calendar month")
        .signed_duration_since(this_month_start)
        .num_days() as u32
}

/// C3: the single writer for the metered-API quota.
pub struct QuotaLedger {
    config: QuotaConfig,
    state: Mutex<LedgerState>,
    store: Box<dyn SettingsStore>,
    events: EventListeners<QuotaEvent>,
}

impl QuotaLedger {
    pub fn new(config: QuotaConfig, store: Box<dyn SettingsStore>) -> Self {
        let state = match store.load() {
            Ok(Some(snapshot)) => LedgerState::from_snapshot(snapshot),
            Ok(None) => LedgerState::fresh(&config),
            Err(_) => LedgerState::fresh(&config),
        };
        Self {
            config,
            state: Mutex::new(state),
            store,
            events: EventListeners::new(),
        }
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: scrape_core::events::EventListener<QuotaEvent> + 'static,
    {
        self.events.add(listener);
    }

    /// `tryAcquire(query)`: the sole admission-and-debit point (spec.md
    /// §4.3 steps 1-6).
    pub async fn try_acquire(&self, query: &str) -> Result<(), QuotaExhaustedReason> {
        let mut state = self.state.lock().await;

        if let Some((month, year)) = state.apply_rollovers(&self.config) {
            self.events.emit(&QuotaEvent::MonthRolledOver {
                month,
                year,
                daily_limit: state.daily_limit,
            });
        }

        if state.remaining == 0 {
            self.events.emit(&QuotaEvent::Rejected {
                reason: "monthly_exhausted",
            });
            return Err(QuotaExhaustedReason::MonthlyExhausted);
        }
        if state.calls_today >= state.daily_limit {
            self.events.emit(&QuotaEvent::Rejected {
                reason: "daily_limit_reached",
            });
            return Err(QuotaExhaustedReason::DailyLimitReached);
        }
        if state.calls_this_hour >= state.hourly_limit {
            self.events.emit(&QuotaEvent::Rejected {
                reason: "hourly_limit_reached",
            });
            return Err(QuotaExhaustedReason::HourlyLimitReached);
        }
        if self.config.free_tier_mode && self.config.high_value_only && !is_high_value(query) {
            self.events.emit(&QuotaEvent::Rejected {
                reason: "low_value_query",
            });
            return Err(QuotaExhaustedReason::LowValueQueryInFreeTier);
        }

        state.remaining -= 1;
        state.used_this_month += 1;
        state.calls_today += 1;
        state.calls_this_hour += 1;

        self.events.emit(&QuotaEvent::Admitted {
            remaining: state.remaining,
            calls_today: state.calls_today,
        });

        Ok(())
    }

    pub async fn snapshot(&self) -> LedgerState {
        self.state.lock().await.clone()
    }

    /// Writes the current ledger state to the settings store. Called by
    /// the orchestrator after every scrape batch (spec.md §4.3).
    pub async fn persist(&self) -> std::io::Result<()> {
        let state = self.state.lock().await;
        self.store.save(&state.to_snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings_store::NullStore;

    fn ledger(config: QuotaConfig) -> QuotaLedger {
        QuotaLedger::new(config, Box::new(NullStore))
    }

    #[tokio::test]
    async fn invariant_used_plus_remaining_equals_monthly_quota() {
        let config = QuotaConfig {
            monthly_quota: 5,
            ..Default::default()
        };
        let ledger = ledger(config.clone());
        for _ in 0..3 {
            ledger.try_acquire("anything").await.ok();
        }
        let state = ledger.snapshot().await;
        assert_eq!(state.used_this_month + state.remaining, config.monthly_quota);
    }

    #[tokio::test]
    async fn monthly_exhaustion_rejects_with_monthly_exhausted() {
        let ledger = ledger(QuotaConfig {
            monthly_quota: 0,
            ..Default::default()
        });
        let err = ledger.try_acquire("any query").await.unwrap_err();
        assert_eq!(err, QuotaExhaustedReason::MonthlyExhausted);
    }

    #[tokio::test]
    async fn low_value_query_rejected_under_free_tier_high_value_only() {
        let config = QuotaConfig {
            monthly_quota: 5,
            free_tier_mode: true,
            high_value_only: true,
            ..Default::default()
        };
        let ledger = ledger(config);
        for _ in 0..10 {
            let err = ledger.try_acquire("random word").await.unwrap_err();
            assert_eq!(err, QuotaExhaustedReason::LowValueQueryInFreeTier);
        }
        assert_eq!(ledger.snapshot().await.remaining, 5);
    }

    #[tokio::test]
    async fn high_value_query_admitted_under_free_tier() {
        let config = QuotaConfig {
            monthly_quota: 5,
            free_tier_mode: true,
            high_value_only: true,
            ..Default::default()
        };
        let ledger = ledger(config);
        ledger
            .try_acquire("site:pnet.co.za software engineer")
            .await
            .unwrap();
        assert_eq!(ledger.snapshot().await.remaining, 4);
    }

    #[test]
    fn dynamic_daily_limit_matches_rollover_scenario() {
        // spec.md §8 scenario 2: remaining=249, days_remaining=30.
        let remaining = 249u32;
        let days_remaining = 30u32;
        let daily_budget = (remaining as f64 / days_remaining as f64) * 0.9;
        let daily_limit = (daily_budget.floor() as u32).max(1);
        assert_eq!(daily_limit, 7);
        let hourly_limit = (daily_limit / 24).max(1);
        assert_eq!(hourly_limit, 1);
    }

    #[test]
    fn days_in_month_handles_december_year_rollover() {
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
    }
}
