//! Start-time configuration for the orchestrator and everything it owns.
//!
//! Field-for-field, this is the configuration table spec.md §6 names; the
//! per-component defaults (circuit success threshold, pool acquire
//! timeout, health tick interval) that table leaves unstated are taken
//! from each component crate's own `Default`. `deny_unknown_fields`
//! throughout, per §9's anti-pattern note on dynamic configs — an unknown
//! key in a config file is a parse error, not a silent ignore.

use scrape_core::BackendKind;
use std::collections::HashMap;
use std::time::Duration;

fn default_max_concurrent_scrapers() -> usize {
    20
}

fn default_scraper_pool_sizes() -> HashMap<BackendKind, usize> {
    let mut sizes = HashMap::new();
    sizes.insert(BackendKind::MeteredApi, 30);
    sizes.insert(BackendKind::Rss, 15);
    sizes.insert(BackendKind::Government, 10);
    sizes.insert(BackendKind::CompanyPage, 15);
    sizes.insert(BackendKind::BrowserDriven, 5);
    sizes
}

fn default_circuit_failure_threshold() -> u32 {
    5
}

fn default_circuit_recovery_timeout_sec() -> u64 {
    60
}

fn default_rate_limit_per_domain() -> usize {
    60
}

fn default_rate_limit_window_sec() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_metered_monthly_quota() -> u32 {
    250
}

fn default_settings_store_path() -> String {
    "quota_settings.json".to_string()
}

fn default_event_bus_endpoint() -> String {
    "events.jsonl".to_string()
}

fn default_scrape_deadline_sec() -> u64 {
    300
}

fn default_metered_domain() -> String {
    "serpapi.com".to_string()
}

/// Recognized configuration fields (spec.md §6). Anything this struct
/// doesn't name is an unrecognized key and `deny_unknown_fields` rejects
/// it at load time rather than ignoring it.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct OrchestratorConfig {
    pub max_concurrent_scrapers: usize,
    pub scraper_pool_sizes: HashMap<BackendKind, usize>,
    pub circuit_failure_threshold: u32,
    pub circuit_recovery_timeout_sec: u64,
    pub rate_limit_per_domain: usize,
    pub rate_limit_window_sec: u64,
    pub adaptive_rate_limiting: bool,
    pub metered_monthly_quota: u32,
    pub metered_free_tier_mode: bool,
    pub event_bus_endpoint: String,
    pub settings_store_path: String,

    /// `selectBackend` step 1's global override (spec.md §4.7): route
    /// every task through `metered_api` regardless of its native kind.
    pub use_metered_first: bool,
    /// `free_tier_mode`'s companion — restrict admission to high-value
    /// queries (spec.md §4.3). Only meaningful when `metered_free_tier_mode`
    /// is set.
    pub metered_high_value_only: bool,
    /// Fixed domain tag the metered backend is keyed under for C1/C2
    /// (there is no hostname to extract — it's one shared upstream).
    pub metered_domain: String,
    /// Per-scrape deadline enforced at C7 (spec.md §5, default 300s).
    pub scrape_deadline_sec: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_scrapers: default_max_concurrent_scrapers(),
            scraper_pool_sizes: default_scraper_pool_sizes(),
            circuit_failure_threshold: default_circuit_failure_threshold(),
            circuit_recovery_timeout_sec: default_circuit_recovery_timeout_sec(),
            rate_limit_per_domain: default_rate_limit_per_domain(),
            rate_limit_window_sec: default_rate_limit_window_sec(),
            adaptive_rate_limiting: default_true(),
            metered_monthly_quota: default_metered_monthly_quota(),
            metered_free_tier_mode: false,
            event_bus_endpoint: default_event_bus_endpoint(),
            settings_store_path: default_settings_store_path(),
            use_metered_first: false,
            metered_high_value_only: false,
            metered_domain: default_metered_domain(),
            scrape_deadline_sec: default_scrape_deadline_sec(),
        }
    }
}

impl OrchestratorConfig {
    pub fn scrape_deadline(&self) -> Duration {
        Duration::from_secs(self.scrape_deadline_sec)
    }

    pub fn circuit_recovery_timeout(&self) -> Duration {
        Duration::from_secs(self.circuit_recovery_timeout_sec)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_sec)
    }

    pub fn pool_size_for(&self, kind: BackendKind) -> usize {
        self.scraper_pool_sizes.get(&kind).copied().unwrap_or(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_table() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.max_concurrent_scrapers, 20);
        assert_eq!(config.circuit_failure_threshold, 5);
        assert_eq!(config.circuit_recovery_timeout_sec, 60);
        assert!(config.adaptive_rate_limiting);
        assert_eq!(config.pool_size_for(BackendKind::MeteredApi), 30);
        assert_eq!(config.pool_size_for(BackendKind::BrowserDriven), 5);
    }

    #[test]
    fn unknown_field_is_rejected_at_parse_time() {
        let err = serde_json::from_str::<OrchestratorConfig>(
            r#"{"max_concurrent_scrapers": 10, "bogus_field": true}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }
}
