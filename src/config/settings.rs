//! User settings and preferences
//!
//! Manages application settings stored in ~/.pgpane/config.toml

use crate::config::ConnectionConfig;
use crate::error::ConfigResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Profile name used when no DSN or --profile is given
    #[serde(default)]
    pub default_connection: Option<String>,

    #[serde(default)]
    pub timeouts: TimeoutSettings,

    #[serde(default)]
    pub logging: LogSettings,
}

/// Time budgets (in seconds) for background database work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutSettings {
    #[serde(default = "default_connect_secs")]
    pub connect: u64,

    #[serde(default = "default_schema_secs")]
    pub schema: u64,

    #[serde(default = "default_columns_secs")]
    pub columns: u64,

    #[serde(default = "default_query_secs")]
    pub query: u64,
}

/// File logging options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_connect_secs() -> u64 {
    10
}

fn default_schema_secs() -> u64 {
    15
}

fn default_columns_secs() -> u64 {
    10
}

fn default_query_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            connect: default_connect_secs(),
            schema: default_schema_secs(),
            columns: default_columns_secs(),
            query: default_query_secs(),
        }
    }
}

impl TimeoutSettings {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect)
    }

    pub fn schema(&self) -> Duration {
        Duration::from_secs(self.schema)
    }

    pub fn columns(&self) -> Duration {
        Duration::from_secs(self.columns)
    }

    pub fn query(&self) -> Duration {
        Duration::from_secs(self.query)
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
        }
    }
}

/// Load settings from config file
pub fn load_settings() -> ConfigResult<Settings> {
    load_settings_from(&ConnectionConfig::config_dir()?.join("config.toml"))
}

/// Load settings from an explicit path; a missing file yields defaults
pub fn load_settings_from(path: &Path) -> ConfigResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}
