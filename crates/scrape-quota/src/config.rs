//! Quota guard configuration (spec.md §4.3, §6).

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct QuotaConfig {
    /// Monthly call budget for the metered backend, e.g. 250.
    pub monthly_quota: u32,
    /// Restrict admission to high-value queries while `free_tier_mode` is set.
    pub free_tier_mode: bool,
    pub high_value_only: bool,
    /// Safety factor applied to the daily-limit formula (spec.md §4.3: 0.9).
    pub daily_safety_factor: f64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            monthly_quota: 250,
            free_tier_mode: false,
            high_value_only: false,
            daily_safety_factor: 0.9,
        }
    }
}
