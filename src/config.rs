//! User configuration
//!
//! Read from `config.toml` in the platform config directory
//! (`~/.config/cityforecast/` on Linux) or from an explicit `--config` path.
//! Every key has a default, so a missing file or a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::forecast::{DEFAULT_FORECAST_DAYS, FORECAST_URL};
use crate::data::geocoding::GEOCODING_URL;
use crate::data::{ForecastRequest, GeocodingRequest};
use crate::ui::theme::Theme;

/// Open-Meteo serves at most 16 forecast days
const MAX_FORECAST_DAYS: u8 = 16;

/// Errors from loading or validating the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Per-request timeout for both upstream calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
    /// Language for geocoder place names
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default)]
    pub theme: Theme,
    /// Cities bound to the number keys in the TUI
    #[serde(default = "default_quick_cities")]
    pub quick_cities: Vec<String>,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    #[serde(default = "default_log_level")]
    pub level: String,
    pub path: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            level: default_log_level(),
            path: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            forecast_days: default_forecast_days(),
            language: default_language(),
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            theme: Theme::default(),
            quick_cities: default_quick_cities(),
            logging: Logging::default(),
        }
    }
}

// Defaults
fn default_timeout_secs() -> u64 {
    10
}
fn default_forecast_days() -> u8 {
    DEFAULT_FORECAST_DAYS
}
fn default_language() -> String {
    "en".to_string()
}
fn default_geocoding_url() -> String {
    GEOCODING_URL.to_string()
}
fn default_forecast_url() -> String {
    FORECAST_URL.to_string()
}
fn default_quick_cities() -> Vec<String> {
    ["London", "Paris", "Tokyo", "New York", "Sydney"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}

impl Config {
    /// Loads the config from `path`, or from the default location when `None`.
    ///
    /// A missing file at the default location yields defaults; a missing
    /// explicit file is an error. Values are not validated here, so callers
    /// apply command-line overrides first and then call [`Config::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Config::default(),
            },
        };
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.forecast_days == 0 || self.forecast_days > MAX_FORECAST_DAYS {
            return Err(ConfigError::Invalid(format!(
                "forecast_days must be between 1 and {}",
                MAX_FORECAST_DAYS
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn geocoding_request(&self) -> GeocodingRequest {
        GeocodingRequest::new(self.geocoding_url.clone()).with_language(self.language.clone())
    }

    pub fn forecast_request(&self) -> ForecastRequest {
        ForecastRequest::new(self.forecast_url.clone()).with_days(self.forecast_days)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// `config.toml` in the platform config directory, if one can be determined
pub fn default_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "cityforecast")?;
    Some(dirs.config_dir().join("config.toml"))
}
