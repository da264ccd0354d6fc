//! # Beach Conditions Core Library
//!
//! This library turns the three pre-fetched dashboard payloads (hourly weather,
//! tide extrema and venue busyness) into the series a renderer needs: a 0-10
//! playability score per forecast hour, hours grouped into calendar days under
//! a fixed local offset, and a continuous tide curve for any selected day.
//!
//! ## Data Flow
//! 1. **Load**: the static JSON files are read concurrently (see [`sources`]);
//!    a broken file only disables its own section
//! 2. **Filter**: hours from days before "today" are dropped ([`days::select_upcoming`])
//! 3. **Score**: every hour gets a daylight-aware score ([`scoring::score`])
//! 4. **Group**: hours are bucketed per local day ([`days::group_by_day`])
//! 5. **Tides**: extrema around the selected day are blended into a
//!    15-minute curve ([`tide_data::interpolate_day`])
//!
//! ## Local Time
//! All day and hour arithmetic uses an explicit [`chrono::FixedOffset`]
//! (UTC+2 for the default location) rather than the machine's timezone, so
//! the same payload always produces the same buckets wherever it is rendered.
//!
//! ## Core Types
//! - [`HourlySample`]: one raw forecast hour
//! - [`ScoredHour`]: a sample with its local instant and score
//! - [`TideExtremum`]: a recorded high or low water event
//! - [`InterpolatedTidePoint`]: one point of the derived tide curve

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub mod chart;
pub mod config;
pub mod days;
pub mod fetch;
pub mod renderer;
pub mod scoring;
pub mod sources;
pub mod tide_data;
pub mod time_bucket;

/// One forecast hour as written by the weather refresh.
///
/// Numeric fields are optional: providers omit values or send placeholders
/// like `"n/a"`. A missing or non-numeric field reads as `None` and scores as
/// the worst bucket for its factor instead of failing the hour.
///
/// # Example
/// ```
/// use beach_conditions_lib::HourlySample;
///
/// let sample: HourlySample = serde_json::from_str(
///     r#"{ "dt": 1736935200, "temp": 22.0, "wind_speed": 5.0, "humidity": 50 }"#,
/// ).unwrap();
///
/// assert_eq!(sample.temp, Some(22.0));
/// assert_eq!(sample.rain_mm, None);
///
/// let patchy: HourlySample = serde_json::from_str(
///     r#"{ "dt": 1736935200, "temp": "n/a", "humidity": null }"#,
/// ).unwrap();
///
/// assert_eq!(patchy.temp, None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    /// Epoch seconds (UTC)
    pub dt: i64,
    /// Air temperature in °C
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub temp: Option<f64>,
    /// Wind speed in km/h
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub wind_speed: Option<f64>,
    /// Cloud cover, percent 0-100
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub clouds: Option<f64>,
    /// Probability of precipitation, 0-1
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub pop: Option<f64>,
    /// Rain in mm over the forecast interval
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub rain_mm: Option<f64>,
    /// Relative humidity, percent 0-100
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub humidity: Option<f64>,
    /// Sunrise, epoch seconds
    #[serde(
        default,
        deserialize_with = "lenient_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub sunrise: Option<i64>,
    /// Sunset, epoch seconds
    #[serde(
        default,
        deserialize_with = "lenient_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub sunset: Option<i64>,
}

impl HourlySample {
    /// The sample's instant, or `None` when `dt` is outside chrono's range.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }
}

/// Any JSON value; numbers become `Some`, everything else `None`.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(serde_json::Value::deserialize(deserializer)?.as_f64())
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(serde_json::Value::deserialize(deserializer)?.as_i64())
}

/// A sample together with its local instant and playability score.
///
/// Recomputed on every load; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredHour {
    pub sample: HourlySample,
    /// The sample instant expressed in the configured local offset
    pub date: DateTime<FixedOffset>,
    /// Playability score, 0-10
    pub score: u8,
}

/// High or low water.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideKind {
    High,
    Low,
}

/// A single tide extremum as stored in `tides.json`.
///
/// # Example
/// ```
/// use beach_conditions_lib::{TideExtremum, TideKind};
///
/// let ext: TideExtremum = serde_json::from_str(
///     r#"{ "time": "2025-01-15T03:12:00+00:00", "height_m": 0.42, "type": "low" }"#,
/// ).unwrap();
///
/// assert_eq!(ext.kind, TideKind::Low);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideExtremum {
    pub time: DateTime<Utc>,
    /// Height in metres relative to the provider's datum
    pub height_m: f64,
    #[serde(rename = "type")]
    pub kind: TideKind,
}

/// One point on the interpolated tide curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct InterpolatedTidePoint {
    pub time: DateTime<Utc>,
    pub height_m: f64,
}
