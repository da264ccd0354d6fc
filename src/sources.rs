//! # Static Data Sources
//!
//! The dashboard reads three JSON files written by the refresh step:
//!
//! | file            | shape                                        |
//! |-----------------|----------------------------------------------|
//! | `weather.json`  | `{ "hourly": [HourlySample, ...] }`          |
//! | `tides.json`    | `{ "tides": [TideExtremum, ...] }`           |
//! | `busyness.json` | `{ "updated": "...", "data": { "monday": [24 ints], ... } }` |
//!
//! The files are read concurrently and each one succeeds or fails on its
//! own: a corrupt tide file must not hide the weather charts. Once loaded the
//! payloads are read-only for the rest of the session.

use crate::{config::Config, HourlySample, TideExtremum};
use chrono::Weekday;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while loading or refreshing a data source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// File could not be read or written
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File exists but is not the expected JSON shape
    #[error("{}: malformed JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Required API key is not set in the environment
    #[error("missing environment variable {0}")]
    MissingKey(&'static str),
}

/// Contents of `weather.json`.
///
/// Entries that are not a usable sample (no numeric `dt`, not an object) are
/// skipped one by one; the rest of the forecast still loads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    #[serde(deserialize_with = "usable_samples")]
    pub hourly: Vec<HourlySample>,
}

fn usable_samples<'de, D>(deserializer: D) -> Result<Vec<HourlySample>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    let total = raw.len();
    let samples: Vec<HourlySample> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if samples.len() < total {
        warn!(skipped = total - samples.len(), "dropped unusable weather samples");
    }
    Ok(samples)
}

/// Contents of `tides.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TidePayload {
    pub tides: Vec<TideExtremum>,
}

/// Contents of `busyness.json`: typical busyness per weekday and hour.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BusynessReport {
    #[serde(default)]
    pub updated: String,
    /// Lower-case English weekday name → percentage per hour of day
    pub data: BTreeMap<String, Vec<u8>>,
}

impl BusynessReport {
    /// Hourly busyness for a weekday, if the venue reported one.
    pub fn for_weekday(&self, day: Weekday) -> Option<&[u8]> {
        self.data.get(weekday_name(day)).map(Vec::as_slice)
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// All three payloads, each with its own outcome.
#[derive(Debug)]
pub struct Sources {
    pub weather: Result<WeatherPayload, SourceError>,
    pub tides: Result<TidePayload, SourceError>,
    pub busyness: Result<BusynessReport, SourceError>,
}

impl Sources {
    /// Hourly samples, empty when the weather file is unavailable.
    pub fn hourly(&self) -> &[HourlySample] {
        self.weather.as_ref().map(|w| w.hourly.as_slice()).unwrap_or(&[])
    }

    /// Tide extrema, empty when the tide file is unavailable.
    pub fn extrema(&self) -> &[TideExtremum] {
        self.tides.as_ref().map(|t| t.tides.as_slice()).unwrap_or(&[])
    }

    pub fn busyness(&self) -> Option<&BusynessReport> {
        self.busyness.as_ref().ok()
    }
}

/// Load all configured data files concurrently.
pub async fn load_all(config: &Config) -> Sources {
    let weather_path = config.weather_path();
    let tides_path = config.tides_path();
    let busyness_path = config.busyness_path();

    let (weather, tides, busyness) = tokio::join!(
        load_json::<WeatherPayload>(&weather_path),
        load_json::<TidePayload>(&tides_path),
        load_json::<BusynessReport>(&busyness_path),
    );

    for err in [
        weather.as_ref().err(),
        tides.as_ref().err(),
        busyness.as_ref().err(),
    ]
    .into_iter()
    .flatten()
    {
        warn!(error = %err, "data source unavailable");
    }

    Sources {
        weather,
        tides,
        busyness,
    }
}

/// Read and parse one JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read data file");

    serde_json::from_slice(&bytes).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a payload as pretty JSON, creating the parent directory.
pub async fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SourceError> {
    let io_err = |source: io::Error| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let data = serde_json::to_vec_pretty(value).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tokio::fs::write(path, data).await.map_err(io_err)
}
