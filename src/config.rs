//! Habitat Configuration
//!
//! Non-heritable environment settings, loaded from `germline.json` in
//! the habitat directory. Every field has a default so a bare habitat
//! works with no config file at all; a partial file overrides only what
//! it names. Heritable biology lives in the genome, never here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::LogLevel;

/// Settings file name within the habitat directory.
pub const SETTINGS_FILENAME: &str = "germline.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Shared food counter file, relative to the habitat.
    pub food_file: String,
    /// Advisory lock file guarding the counter.
    pub lock_file: String,
    /// SQLite spawn ledger.
    pub ledger_file: String,
    /// Directory for child genome artifacts.
    pub brood_dir: String,
    /// Sentinel file whose presence halts every cooperating creature.
    pub halt_file: String,
    /// UDP address of the telemetry collector.
    pub collector_addr: String,
    /// Eating waits longer than farming; hunger is the more urgent errand.
    pub eat_lock_timeout_ms: u64,
    pub farm_lock_timeout_ms: u64,
    /// Interval between lock acquisition attempts.
    pub lock_poll_ms: u64,
    /// Pause between ticks; forced to zero in verification runs.
    pub tick_delay_ms: u64,
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            food_file: "food".to_string(),
            lock_file: "food.lock".to_string(),
            ledger_file: "ledger.db".to_string(),
            brood_dir: "brood".to_string(),
            halt_file: "halt".to_string(),
            collector_addr: "127.0.0.1:9020".to_string(),
            eat_lock_timeout_ms: 3_000,
            farm_lock_timeout_ms: 1_000,
            lock_poll_ms: 25,
            tick_delay_ms: 1_000,
            log_level: LogLevel::Info,
        }
    }
}

impl Settings {
    /// Load settings from the habitat, falling back to the defaults when
    /// the file is absent or does not parse.
    pub fn load(habitat: &Path) -> Settings {
        let path = habitat.join(SETTINGS_FILENAME);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(_) => return Settings::default(),
        };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable settings, using defaults");
                Settings::default()
            }
        }
    }
}

/// Expand a leading `~` in a habitat argument to the home directory.
/// Anything else passes through untouched, relative paths included.
pub fn resolve_habitat(raw: &str) -> PathBuf {
    match raw.strip_prefix('~') {
        Some(rest) => {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
            home.join(rest.trim_start_matches('/'))
        }
        None => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.food_file, "food");
        assert_eq!(settings.lock_file, "food.lock");
        assert_eq!(settings.collector_addr, "127.0.0.1:9020");
        assert_eq!(settings.eat_lock_timeout_ms, 3_000);
        assert_eq!(settings.farm_lock_timeout_ms, 1_000);
        assert_eq!(settings.tick_delay_ms, 1_000);
        assert_eq!(settings.log_level, LogLevel::Info);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.food_file, "food");
    }

    #[test]
    fn test_partial_file_overrides_only_named_fields() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{"tickDelayMs": 0, "collectorAddr": "127.0.0.1:9999"}"#,
        )
        .unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.tick_delay_ms, 0);
        assert_eq!(settings.collector_addr, "127.0.0.1:9999");
        assert_eq!(settings.food_file, "food");
        assert_eq!(settings.eat_lock_timeout_ms, 3_000);
    }

    #[test]
    fn test_garbage_file_loads_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILENAME), "not json at all").unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.food_file, "food");
    }

    #[test]
    fn test_habitat_tilde_expands_to_home() {
        let resolved = resolve_habitat("~/colony/west");
        assert!(!resolved.to_string_lossy().contains('~'));
        assert!(resolved.ends_with("colony/west"));
    }

    #[test]
    fn test_habitat_absolute_path_passes_through() {
        let resolved = resolve_habitat("/var/lib/germline");
        assert_eq!(resolved, PathBuf::from("/var/lib/germline"));
    }

    #[test]
    fn test_habitat_relative_path_passes_through() {
        assert_eq!(resolve_habitat("."), PathBuf::from("."));
    }
}
