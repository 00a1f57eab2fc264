//! Application configuration management.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Scheduler configuration.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Scheduler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// IANA timezone the users' wall-clock times are expressed in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Seconds between two catch-up sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Run a single sweep and exit.
    #[serde(default)]
    pub run_once: bool,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            sweep_interval_secs: default_sweep_interval(),
            run_once: false,
        }
    }
}

impl SchedulerConfig {
    /// Parses the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the name is not a known IANA timezone.
    pub fn tz(&self) -> AppResult<chrono_tz::Tz> {
        self.timezone.parse::<chrono_tz::Tz>().map_err(|e| {
            AppError::Configuration(format!("invalid timezone {:?}: {e}", self.timezone))
        })
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON snapshot holding schedules and history.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

fn default_snapshot_path() -> String {
    "data/finaizen.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if configuration cannot be loaded.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINAIZEN").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
