//! Runtime configuration for core callers.
//!
//! # Responsibility
//! - Resolve database and logging settings from the process environment.
//! - Hold the default recurrence expansion horizons.
//!
//! # Invariants
//! - Resolution never fails; blank or missing values fall back to defaults.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ROUTINELY_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "ROUTINELY_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ROUTINELY_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "routinely.sqlite3";

/// How far open-ended repeat rules are expanded past `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarHorizon {
    pub weekly_days: u32,
    pub monthly_years: u32,
    pub yearly_years: u32,
}

impl Default for CalendarHorizon {
    fn default() -> Self {
        Self {
            weekly_days: 365,
            monthly_years: 5,
            yearly_years: 20,
        }
    }
}

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging stays off when `None`.
    pub log_dir: Option<String>,
    pub horizon: CalendarHorizon,
}

impl CoreConfig {
    /// Resolves settings from `ROUTINELY_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through a caller-provided lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: non_blank(LOG_LEVEL_ENV)
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: non_blank(LOG_DIR_ENV),
            horizon: CalendarHorizon::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CalendarHorizon, CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::path::PathBuf;

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = CoreConfig::from_lookup(|key| match key {
            DB_PATH_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert!(config.db_path.ends_with("routinely.sqlite3"));
        assert!(config.log_dir.is_none());
        assert_eq!(config.horizon, CalendarHorizon::default());
    }

    #[test]
    fn explicit_values_are_trimmed() {
        let config = CoreConfig::from_lookup(|key| match key {
            DB_PATH_ENV => Some(" /data/routinely.db ".to_string()),
            LOG_LEVEL_ENV => Some("warn".to_string()),
            LOG_DIR_ENV => Some("/var/log/routinely".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/data/routinely.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/routinely"));
    }
}
