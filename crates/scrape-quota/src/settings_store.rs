//! Persistence boundary for [`crate::QuotaLedger`] (spec.md §4.3, §6).
//!
//! The quota ledger is the one piece of core state that must survive
//! process restarts. Persistence itself is out of scope for this crate
//! (spec.md §1), so this is a narrow trait with a file-backed default
//! rather than a full storage layer.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;

/// The subset of [`crate::LedgerState`] that gets written back to disk
/// after every scrape batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    pub used_this_month: u32,
    pub remaining: u32,
    pub daily_limit: u32,
    pub hourly_limit: u32,
    pub calls_today: u32,
    pub calls_this_hour: u32,
    pub last_hourly_reset_hour: u32,
    pub last_daily_reset_date: chrono::NaiveDate,
    pub last_month_reset_month: u32,
    pub last_month_reset_year: i32,
}

pub trait SettingsStore: Send + Sync {
    fn load(&self) -> io::Result<Option<QuotaSnapshot>>;
    fn save(&self, snapshot: &QuotaSnapshot) -> io::Result<()>;
}

/// Default [`SettingsStore`]: one JSON file, read on startup and
/// overwritten after every batch.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> io::Result<Option<QuotaSnapshot>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let snapshot = serde_json::from_str(&contents)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                Ok(Some(snapshot))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, snapshot: &QuotaSnapshot) -> io::Result<()> {
        let contents = serde_json::to_string_pretty(snapshot)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)
    }
}

/// In-memory store used in tests and by callers who opt out of persistence.
#[derive(Default)]
pub struct NullStore;

impl SettingsStore for NullStore {
    fn load(&self) -> io::Result<Option<QuotaSnapshot>> {
        Ok(None)
    }

    fn save(&self, _snapshot: &QuotaSnapshot) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quota.json");
        let store = JsonFileStore::new(&path);

        assert!(store.load().unwrap().is_none());

        let snapshot = QuotaSnapshot {
            used_this_month: 10,
            remaining: 240,
            daily_limit: 7,
            hourly_limit: 1,
            calls_today: 2,
            calls_this_hour: 1,
            last_hourly_reset_hour: 14,
            last_daily_reset_date: chrono::NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            last_month_reset_month: 9,
            last_month_reset_year: 2025,
        };
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }
}
