//! # Provider Refresh
//!
//! Rewrites the static JSON files from the upstream providers:
//! - **Weather**: OpenWeatherMap 2.5 `forecast` (3-hourly, metric), key in `OWM_API_KEY`
//! - **Tides**: Stormglass tide extremes, key in `STORMGLASS_API_KEY`
//!
//! Busyness is not fetched here; `busyness.json` is maintained by hand or by
//! an external job.
//!
//! ## Caching Strategy
//! A data file younger than `cache_ttl_minutes` (by modification time) is
//! left alone, so re-running the refresh during development does not burn
//! API quota.
//!
//! ## Tide History
//! Stormglass only returns the requested window. New extrema are merged into
//! the existing file instead of replacing it, so the curve for earlier days
//! keeps its bounding points.

use crate::config::Config;
use crate::sources::{self, SourceError, TidePayload, WeatherPayload};
use crate::{tide_data, HourlySample, TideExtremum, TideKind};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, info};

const OWM_FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
const STORMGLASS_EXTREMES_URL: &str = "https://api.stormglass.io/v2/tide/extremes/point";

pub const OWM_KEY_VAR: &str = "OWM_API_KEY";
pub const STORMGLASS_KEY_VAR: &str = "STORMGLASS_API_KEY";

/// What a refresh did to one data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// File was younger than the TTL and left untouched
    Fresh,
    /// File was rewritten with this many entries
    Updated(usize),
}

// -- OpenWeatherMap response --

#[derive(Debug, Deserialize)]
struct OwmForecast {
    list: Vec<OwmEntry>,
}

#[derive(Debug, Deserialize)]
struct OwmEntry {
    dt: i64,
    main: OwmMain,
    #[serde(default)]
    wind: Option<OwmWind>,
    #[serde(default)]
    clouds: Option<OwmClouds>,
    #[serde(default)]
    pop: Option<f64>,
    #[serde(default)]
    rain: Option<HashMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmClouds {
    all: Option<f64>,
}

// -- Stormglass response --

#[derive(Debug, Deserialize)]
struct StormglassExtremes {
    data: Vec<StormglassEntry>,
}

#[derive(Debug, Deserialize)]
struct StormglassEntry {
    time: DateTime<Utc>,
    height: f64,
    #[serde(rename = "type")]
    kind: TideKind,
}

/// Read an API key from the environment.
pub fn api_key(var: &'static str) -> Result<String, SourceError> {
    std::env::var(var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or(SourceError::MissingKey(var))
}

/// Whether `path` was modified less than `ttl_minutes` ago.
pub fn is_fresh(path: &Path, ttl_minutes: u64) -> bool {
    let Ok(modified) = std::fs::metadata(path).and_then(|m| m.modified()) else {
        return false;
    };
    SystemTime::now()
        .duration_since(modified)
        .map(|age| age.as_secs() < ttl_minutes * 60)
        .unwrap_or(false)
}

/// Refresh both provider files concurrently.
pub async fn refresh_all(
    client: &reqwest::Client,
    config: &Config,
) -> (
    Result<RefreshOutcome, SourceError>,
    Result<RefreshOutcome, SourceError>,
) {
    tokio::join!(
        refresh_weather(client, config),
        refresh_tides(client, config, Utc::now())
    )
}

/// Rewrite `weather.json` unless it is still fresh.
pub async fn refresh_weather(
    client: &reqwest::Client,
    config: &Config,
) -> Result<RefreshOutcome, SourceError> {
    let path = config.weather_path();
    if is_fresh(&path, config.data.cache_ttl_minutes) {
        debug!(path = %path.display(), "weather file still fresh");
        return Ok(RefreshOutcome::Fresh);
    }

    let key = api_key(OWM_KEY_VAR)?;
    let lat = config.location.lat.to_string();
    let lon = config.location.lon.to_string();
    let response = client
        .get(OWM_FORECAST_URL)
        .query(&[
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("units", "metric"),
            ("appid", key.as_str()),
        ])
        .send()
        .await?;
    let forecast: OwmForecast = checked(response, "OpenWeatherMap").await?.json().await?;

    let payload = weather_from_forecast(forecast);
    sources::save_json(&path, &payload).await?;
    info!(entries = payload.hourly.len(), path = %path.display(), "weather data written");

    Ok(RefreshOutcome::Updated(payload.hourly.len()))
}

/// Merge the next few days of extrema into `tides.json` unless it is still fresh.
pub async fn refresh_tides(
    client: &reqwest::Client,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<RefreshOutcome, SourceError> {
    let path = config.tides_path();
    if is_fresh(&path, config.data.cache_ttl_minutes) {
        debug!(path = %path.display(), "tide file still fresh");
        return Ok(RefreshOutcome::Fresh);
    }

    let key = api_key(STORMGLASS_KEY_VAR)?;
    let end = now + Duration::days(config.data.tide_forecast_days);
    let lat = config.location.tide_lat.to_string();
    let lng = config.location.tide_lon.to_string();
    let start = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let end = end.to_rfc3339_opts(SecondsFormat::Millis, true);
    let response = client
        .get(STORMGLASS_EXTREMES_URL)
        .header(reqwest::header::AUTHORIZATION, key)
        .query(&[
            ("lat", lat.as_str()),
            ("lng", lng.as_str()),
            ("start", start.as_str()),
            ("end", end.as_str()),
        ])
        .send()
        .await?;
    let extremes: StormglassExtremes = checked(response, "Stormglass").await?.json().await?;

    let incoming = extrema_from_stormglass(extremes);
    let fetched = incoming.len();

    // An unreadable history file is replaced rather than blocking the refresh
    let existing = sources::load_json::<TidePayload>(&path)
        .await
        .map(|p| p.tides)
        .unwrap_or_default();
    let payload = TidePayload {
        tides: tide_data::merge_extrema(existing, incoming),
    };
    sources::save_json(&path, &payload).await?;
    info!(fetched, total = payload.tides.len(), path = %path.display(), "tide data merged");

    Ok(RefreshOutcome::Updated(payload.tides.len()))
}

async fn checked(
    response: reqwest::Response,
    provider: &'static str,
) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::Status {
        provider,
        status: status.as_u16(),
        body,
    })
}

fn weather_from_forecast(forecast: OwmForecast) -> WeatherPayload {
    let hourly = forecast
        .list
        .into_iter()
        .map(|entry| HourlySample {
            dt: entry.dt,
            temp: entry.main.temp,
            wind_speed: entry.wind.and_then(|w| w.speed),
            clouds: entry.clouds.and_then(|c| c.all),
            pop: Some(entry.pop.unwrap_or(0.0)),
            rain_mm: Some(
                entry
                    .rain
                    .and_then(|r| r.get("3h").copied())
                    .unwrap_or(0.0),
            ),
            humidity: entry.main.humidity,
            sunrise: None,
            sunset: None,
        })
        .collect();
    WeatherPayload { hourly }
}

fn extrema_from_stormglass(extremes: StormglassExtremes) -> Vec<TideExtremum> {
    extremes
        .data
        .into_iter()
        .map(|e| TideExtremum {
            time: e.time,
            height_m: e.height,
            kind: e.kind,
        })
        .collect()
}
