//! Configuration loading and typed config structures for Taleclock.
//!
//! The canonical configuration lives in `taleclock-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads the file and
//! applies environment overrides.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use taleclock_types::CampaignId;

use crate::clock::{ClockError, ClockSettings};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Taleclock configuration.
///
/// Mirrors the structure of `taleclock-config.yaml`. Every field has a
/// default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaleclockConfig {
    /// Campaign clock settings.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Storage and HTTP endpoints.
    #[serde(default)]
    pub infrastructure: InfrastructureConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TaleclockConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `DRAGONFLY_URL` overrides `infrastructure.dragonfly_url`
    /// - `TALECLOCK_PORT` overrides `infrastructure.observer_port`
    /// - `TALECLOCK_CAMPAIGN` overrides `clock.campaign_id`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DRAGONFLY_URL") {
            self.infrastructure.dragonfly_url = val;
        }
        if let Ok(val) = std::env::var("TALECLOCK_CAMPAIGN") {
            self.clock.campaign_id = val;
        }
        if let Some(port) = std::env::var("TALECLOCK_PORT")
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
        {
            self.infrastructure.observer_port = port;
        }
    }
}

/// Campaign clock configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClockConfig {
    /// Key under which the campaign's timestamp is restored and saved.
    #[serde(default = "default_campaign_id")]
    pub campaign_id: String,

    /// Origin of the timeline when nothing has been saved yet.
    #[serde(default = "default_start_date")]
    pub start_date: DateTime<Utc>,

    /// Fictional milliseconds advanced per real millisecond.
    #[serde(default = "default_fantasy_time_ratio")]
    pub fantasy_time_ratio: f64,

    /// Minimum fictional-time gap between automatic saves.
    #[serde(default = "default_persistence_interval_ms")]
    pub persistence_interval_ms: u64,

    /// Real milliseconds between ticks while running.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

impl ClockConfig {
    /// The configured campaign identity.
    pub fn campaign(&self) -> CampaignId {
        CampaignId::new(self.campaign_id.as_str())
    }

    /// Validate and convert into [`ClockSettings`].
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the ratio or interval is
    /// out of range.
    pub fn settings(&self) -> Result<ClockSettings, ClockError> {
        ClockSettings::new(self.fantasy_time_ratio, self.persistence_interval_ms)
    }

    /// Tick period of the driver. Zero is raised to one millisecond.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            campaign_id: default_campaign_id(),
            start_date: default_start_date(),
            fantasy_time_ratio: default_fantasy_time_ratio(),
            persistence_interval_ms: default_persistence_interval_ms(),
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

/// Storage and HTTP endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfrastructureConfig {
    /// Dragonfly (Redis-compatible) URL. Empty selects the in-memory store.
    #[serde(default = "default_dragonfly_url")]
    pub dragonfly_url: String,

    /// Host the control API binds to.
    #[serde(default = "default_observer_host")]
    pub observer_host: String,

    /// Port the control API listens on.
    #[serde(default = "default_observer_port")]
    pub observer_port: u16,
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            dragonfly_url: default_dragonfly_url(),
            observer_host: default_observer_host(),
            observer_port: default_observer_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_campaign_id() -> String {
    String::from("default")
}

fn default_start_date() -> DateTime<Utc> {
    // 2024-01-01T08:00:00Z
    DateTime::from_timestamp(1_704_096_000, 0).unwrap_or_default()
}

const fn default_fantasy_time_ratio() -> f64 {
    ClockSettings::DEFAULT_FANTASY_TIME_RATIO
}

const fn default_persistence_interval_ms() -> u64 {
    ClockSettings::DEFAULT_PERSISTENCE_INTERVAL_MS
}

const fn default_refresh_interval_ms() -> u64 {
    16
}

fn default_dragonfly_url() -> String {
    String::from("redis://localhost:6379")
}

fn default_observer_host() -> String {
    String::from("0.0.0.0")
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    String::from("info")
}
