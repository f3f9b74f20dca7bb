//! Application settings loaded from a TOML file.
//!
//! Only non-secret values live here. The Discord token and the database URL
//! are read from the environment (see `main.rs` and [`super::database`]).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable overriding the settings file location
pub const SETTINGS_PATH_VAR: &str = "SAVINGS_BUDDY_CONFIG";

const DEFAULT_SETTINGS_PATH: &str = "config.toml";

/// Root of the settings file
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Where balance notifications are delivered
    #[serde(default)]
    pub notifications: NotificationSettings,
    /// Periodic trigger for the live interest run
    #[serde(default)]
    pub scheduler: SchedulerSettings,
}

/// Notification delivery settings
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    /// Discord channel that receives notifications; `None` logs them only
    pub channel_id: Option<u64>,
}

/// Scheduler settings
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Whether the background interest run is started at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Seconds between checks for a payout day
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            check_interval_secs: default_check_interval_secs(),
        }
    }
}

const fn default_enabled() -> bool {
    true
}

const fn default_check_interval_secs() -> u64 {
    3600
}

/// Parses settings from a TOML string.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings: {e}"),
    })?;
    if settings.scheduler.check_interval_secs == 0 {
        return Err(Error::Config {
            message: "scheduler.check_interval_secs must be greater than zero".to_string(),
        });
    }
    Ok(settings)
}

/// Loads settings from a TOML file.
///
/// A missing file yields the defaults; an unreadable or malformed file is an error.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("Settings file {:?} not found, using defaults", path);
        return Ok(Settings::default());
    }
    debug!("Loading settings from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {}: {e}", path.display()),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `$SAVINGS_BUDDY_CONFIG`, falling back to `./config.toml`.
pub fn load_default_settings() -> Result<Settings> {
    let path =
        std::env::var(SETTINGS_PATH_VAR).unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
    load_settings(path)
}
