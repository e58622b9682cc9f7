//! # Configuration
//!
//! Operator settings for rxdist.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RXDIST_SNAPSHOT=/srv/rxdist/snapshot.json                          │
//! │     RXDIST_CRITICAL_WINDOW_DAYS=45                                     │
//! │     RXDIST_LOG=debug   RXDIST_LOG_JSON=true                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/rxdist/rxdist.toml (Linux)                               │
//! │     ~/Library/Application Support/in.rxdist.rxdist/rxdist.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [snapshot]
//! path = "data/snapshot.json"
//!
//! [inventory]
//! critical_window_days = 30
//!
//! [logging]
//! filter = "info"
//! json = false
//! ```

use std::path::{Path, PathBuf};

use rxdist_core::inventory::InventoryValuer;
use rxdist_core::EXPIRY_CRITICAL_DAYS;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// File name looked up in the platform config dir.
pub const CONFIG_FILE_NAME: &str = "rxdist.toml";

// =============================================================================
// Sections
// =============================================================================

/// Where the records live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSettings {
    #[serde(default = "default_snapshot_path")]
    pub path: PathBuf,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/snapshot.json")
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        SnapshotSettings {
            path: default_snapshot_path(),
        }
    }
}

/// Inventory valuation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Days after today within which a batch counts as critical.
    #[serde(default = "default_critical_window")]
    pub critical_window_days: i64,
}

fn default_critical_window() -> i64 {
    EXPIRY_CRITICAL_DAYS
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            critical_window_days: default_critical_window(),
        }
    }
}

/// Log output settings, read by the CLI when it installs the subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `"info"` or `"rxdist_store=debug"`.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
            json: false,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete rxdist configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RxdistConfig {
    #[serde(default)]
    pub snapshot: SnapshotSettings,

    #[serde(default)]
    pub inventory: InventorySettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl RxdistConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (an explicit path must exist; the default path may not)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else if explicit {
                return Err(StoreError::InvalidConfig(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without env overrides or validation.
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.snapshot.path.as_os_str().is_empty() {
            return Err(StoreError::InvalidConfig(
                "snapshot.path must not be empty".into(),
            ));
        }

        if self.inventory.critical_window_days < 0 {
            return Err(StoreError::InvalidConfig(format!(
                "inventory.critical_window_days must be >= 0, got {}",
                self.inventory.critical_window_days
            )));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "logging.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies `RXDIST_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("RXDIST_SNAPSHOT") {
            debug!(path = %path, "Overriding snapshot path from environment");
            self.snapshot.path = PathBuf::from(path);
        }

        if let Some(days) = lookup("RXDIST_CRITICAL_WINDOW_DAYS") {
            match days.parse::<i64>() {
                Ok(d) => self.inventory.critical_window_days = d,
                Err(_) => warn!(value = %days, "Ignoring non-numeric RXDIST_CRITICAL_WINDOW_DAYS"),
            }
        }

        if let Some(filter) = lookup("RXDIST_LOG") {
            self.logging.filter = filter;
        }

        if let Some(json) = lookup("RXDIST_LOG_JSON") {
            match json.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.logging.json = true,
                "0" | "false" | "no" => self.logging.json = false,
                _ => warn!(value = %json, "Unknown RXDIST_LOG_JSON value"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("in", "rxdist", "rxdist")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot.path
    }

    /// Valuer carrying the configured critical window.
    pub fn valuer(&self) -> InventoryValuer {
        InventoryValuer::new(self.inventory.critical_window_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = RxdistConfig::default();
        assert_eq!(config.snapshot.path, PathBuf::from("data/snapshot.json"));
        assert_eq!(config.inventory.critical_window_days, 30);
        assert_eq!(config.logging.filter, "info");
        assert!(!config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RxdistConfig = toml::from_str("[inventory]\ncritical_window_days = 45\n").unwrap();
        assert_eq!(config.inventory.critical_window_days, 45);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("RXDIST_SNAPSHOT", "/srv/snap.json"),
            ("RXDIST_CRITICAL_WINDOW_DAYS", "60"),
            ("RXDIST_LOG_JSON", "true"),
        ]
        .into_iter()
        .collect();

        let mut config = RxdistConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.snapshot_path(), Path::new("/srv/snap.json"));
        assert_eq!(config.valuer().critical_window_days(), 60);
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_bad_override_is_ignored() {
        let mut config = RxdistConfig::default();
        config.apply_overrides(|k| (k == "RXDIST_CRITICAL_WINDOW_DAYS").then(|| "soon".to_string()));
        assert_eq!(config.inventory.critical_window_days, 30);
    }

    #[test]
    fn test_config_validation() {
        let mut config = RxdistConfig::default();
        config.inventory.critical_window_days = -1;
        assert!(config.validate().is_err());

        let mut config = RxdistConfig::default();
        config.logging.filter = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&RxdistConfig::default()).unwrap();
        assert!(toml_str.contains("[snapshot]"));
        assert!(toml_str.contains("[inventory]"));
        assert!(toml_str.contains("[logging]"));
    }
}
