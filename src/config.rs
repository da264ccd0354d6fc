//! # Configuration Management
//!
//! Loads `beach-config.toml`: which beach is shown, the local UTC offset used
//! for day bucketing, and where the static data files live. A missing or
//! broken file never stops the dashboard; the Clifton defaults are used.

use crate::time_bucket;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "beach-config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Offset of a full day or more
    #[error("invalid UTC offset: {0} minutes")]
    InvalidOffset(i32),

    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration loaded from beach-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub location: LocationConfig,
    pub time: TimeConfig,
    pub data: DataConfig,
}

/// The beach being reported on
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocationConfig {
    /// Short name, e.g. "Clifton"
    pub name: String,
    /// Page heading
    pub title: String,
    /// Weather forecast point
    pub lat: f64,
    pub lon: f64,
    /// Tide station point (often a nearby harbour)
    pub tide_lat: f64,
    pub tide_lon: f64,
}

/// Local time settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimeConfig {
    /// Minutes east of UTC used for day keys and daylight hours
    pub utc_offset_minutes: i32,
}

/// Static data file settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DataConfig {
    /// Directory holding weather.json, tides.json and busyness.json
    pub dir: PathBuf,
    /// Files younger than this are not re-fetched by `--refresh`
    pub cache_ttl_minutes: u64,
    /// How far ahead tide extrema are requested
    pub tide_forecast_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            location: LocationConfig {
                name: "Clifton".to_string(),
                title: "Clifton Beach Conditions".to_string(),
                lat: -33.9509,
                lon: 18.3774,
                tide_lat: -33.9258,
                tide_lon: 18.4232,
            },
            time: TimeConfig {
                utc_offset_minutes: 120,
            },
            data: DataConfig {
                dir: PathBuf::from("data"),
                cache_ttl_minutes: 60,
                tide_forecast_days: 5,
            },
        }
    }
}

impl Config {
    /// Load configuration from beach-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(location = %config.location.name, "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save current configuration to `path`
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    /// Save current configuration to beach-config.toml
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(CONFIG_FILE)
    }

    /// The configured local offset.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        time_bucket::offset_from_minutes(self.time.utc_offset_minutes)
            .ok_or(ConfigError::InvalidOffset(self.time.utc_offset_minutes))
    }

    pub fn weather_path(&self) -> PathBuf {
        self.data.dir.join("weather.json")
    }

    pub fn tides_path(&self) -> PathBuf {
        self.data.dir.join("tides.json")
    }

    pub fn busyness_path(&self) -> PathBuf {
        self.data.dir.join("busyness.json")
    }
}
