//! # Playability Score
//!
//! Rates a single forecast hour from 0 (stay home) to 10 (perfect beach
//! weather). The score is built from four banded factors:
//!
//! | factor      | bands                                                     | max |
//! |-------------|-----------------------------------------------------------|-----|
//! | wind (km/h) | <10 → 10, <15 → 8, <20 → 6, <25 → 4, <30 → 2, else 0      | 10  |
//! | rain (mm)   | 0 → 10, <0.5 → 5, <1 → 2, else 0                          | 10  |
//! | temp (°C)   | ≤2 → 0, ≤8 → 2, ≤12 → 4, ≤25 → 10, ≤30 → 6, ≤35 → 4, ≤40 → 2 | 10  |
//! | humidity %  | <80 → 5, else 3                                           | 5   |
//!
//! The sum (max 35) is divided by 3.5 and rounded half-up. Two rules short
//! circuit the sum:
//! - hours outside the daylight window always score 0
//! - wind above 30 km/h, rain above 1 mm or temperature above 37 °C score 0
//!
//! A missing or non-finite value lands in the worst band of its factor.

use crate::{time_bucket, HourlySample};
use chrono::FixedOffset;

/// Local sunrise hour used when the sample carries no sunrise.
pub const DEFAULT_SUNRISE_HOUR: u32 = 6;
/// Local sunset hour used when the sample carries no sunset.
pub const DEFAULT_SUNSET_HOUR: u32 = 19;

pub const MAX_SCORE: u8 = 10;

const SUM_DIVISOR: f64 = 3.5;

const WIND_CUTOFF_KMH: f64 = 30.0;
const RAIN_CUTOFF_MM: f64 = 1.0;
const TEMP_CUTOFF_C: f64 = 37.0;

/// Score one hour under the given local offset.
///
/// ```
/// use beach_conditions_lib::{scoring, time_bucket, HourlySample};
///
/// let offset = time_bucket::offset_from_minutes(120).unwrap();
/// let noon = HourlySample {
///     dt: 1736935200, // 12:00 local
///     wind_speed: Some(5.0),
///     rain_mm: Some(0.0),
///     temp: Some(22.0),
///     humidity: Some(50.0),
///     ..Default::default()
/// };
///
/// assert_eq!(scoring::score(&noon, offset), 10);
/// ```
pub fn score(sample: &HourlySample, offset: FixedOffset) -> u8 {
    if !in_daylight(sample, offset) {
        return 0;
    }
    if trips_guard(sample) {
        return 0;
    }

    let sum = wind_points(sample.wind_speed)
        + rain_points(sample.rain_mm)
        + temp_points(sample.temp)
        + humidity_points(sample.humidity);

    let rounded = (f64::from(sum) / SUM_DIVISOR + 0.5).floor();
    rounded.clamp(0.0, f64::from(MAX_SCORE)) as u8
}

/// Whether the sample's local hour lies inside `[sunrise, sunset]`.
///
/// Samples whose own timestamp is unusable are treated as dark.
pub fn in_daylight(sample: &HourlySample, offset: FixedOffset) -> bool {
    let Some(hour) = time_bucket::local_hour(sample.dt, offset) else {
        return false;
    };
    let sunrise = sample
        .sunrise
        .and_then(|ts| time_bucket::local_hour(ts, offset))
        .unwrap_or(DEFAULT_SUNRISE_HOUR);
    let sunset = sample
        .sunset
        .and_then(|ts| time_bucket::local_hour(ts, offset))
        .unwrap_or(DEFAULT_SUNSET_HOUR);

    (sunrise..=sunset).contains(&hour)
}

/// Extreme conditions that zero the score regardless of the other factors.
pub fn trips_guard(sample: &HourlySample) -> bool {
    finite(sample.wind_speed).is_some_and(|w| w > WIND_CUTOFF_KMH)
        || finite(sample.rain_mm).is_some_and(|r| r > RAIN_CUTOFF_MM)
        || finite(sample.temp).is_some_and(|t| t > TEMP_CUTOFF_C)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn wind_points(kmh: Option<f64>) -> u8 {
    match finite(kmh) {
        Some(w) if w < 10.0 => 10,
        Some(w) if w < 15.0 => 8,
        Some(w) if w < 20.0 => 6,
        Some(w) if w < 25.0 => 4,
        Some(w) if w < 30.0 => 2,
        _ => 0,
    }
}

fn rain_points(mm: Option<f64>) -> u8 {
    match finite(mm) {
        Some(r) if r == 0.0 => 10,
        Some(r) if r < 0.5 => 5,
        Some(r) if r < 1.0 => 2,
        _ => 0,
    }
}

fn temp_points(celsius: Option<f64>) -> u8 {
    match finite(celsius) {
        Some(t) if t <= 2.0 => 0,
        Some(t) if t <= 8.0 => 2,
        Some(t) if t <= 12.0 => 4,
        Some(t) if t <= 25.0 => 10,
        Some(t) if t <= 30.0 => 6,
        Some(t) if t <= 35.0 => 4,
        Some(t) if t <= 40.0 => 2,
        _ => 0,
    }
}

fn humidity_points(percent: Option<f64>) -> u8 {
    match finite(percent) {
        Some(h) if h < 80.0 => 5,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn utc2() -> FixedOffset {
        time_bucket::offset_from_minutes(120).unwrap()
    }

    /// Epoch seconds for a local (UTC+2) wall-clock hour on 2025-01-15.
    fn local(hour: u32) -> i64 {
        let stamp = format!("2025-01-15T{:02}:00:00+02:00", hour);
        DateTime::parse_from_rfc3339(&stamp)
            .unwrap()
            .with_timezone(&Utc)
            .timestamp()
    }

    fn calm(hour: u32) -> HourlySample {
        HourlySample {
            dt: local(hour),
            wind_speed: Some(5.0),
            rain_mm: Some(0.0),
            temp: Some(22.0),
            humidity: Some(50.0),
            ..Default::default()
        }
    }

    #[test]
    fn perfect_hour_scores_ten() {
        assert_eq!(score(&calm(12), utc2()), 10);
    }

    #[test]
    fn strong_wind_trips_guard() {
        let sample = HourlySample {
            wind_speed: Some(35.0),
            temp: Some(20.0),
            ..calm(12)
        };
        assert_eq!(score(&sample, utc2()), 0);
    }

    #[test]
    fn heavy_rain_and_heat_trip_guard() {
        let wet = HourlySample {
            rain_mm: Some(1.2),
            ..calm(12)
        };
        let hot = HourlySample {
            temp: Some(37.5),
            ..calm(12)
        };
        assert_eq!(score(&wet, utc2()), 0);
        assert_eq!(score(&hot, utc2()), 0);
    }

    #[test]
    fn boundary_values_sit_below_guard() {
        // wind 30 → 0, rain 1 → 0, temp 37 → 2, humidity 50 → 5; 7 / 3.5 = 2
        let sample = HourlySample {
            wind_speed: Some(30.0),
            rain_mm: Some(1.0),
            temp: Some(37.0),
            ..calm(12)
        };
        assert_eq!(score(&sample, utc2()), 2);
    }

    #[test]
    fn night_hours_score_zero_with_default_daylight() {
        assert_eq!(score(&calm(5), utc2()), 0);
        assert_eq!(score(&calm(6), utc2()), 10);
        assert_eq!(score(&calm(19), utc2()), 10);
        assert_eq!(score(&calm(20), utc2()), 0);
    }

    #[test]
    fn sample_sun_times_override_defaults() {
        let sample = HourlySample {
            sunrise: Some(local(8)),
            sunset: Some(local(17)),
            ..calm(7)
        };
        assert_eq!(score(&sample, utc2()), 0);

        let evening = HourlySample {
            sunrise: Some(local(5)),
            sunset: Some(local(21)),
            ..calm(20)
        };
        assert_eq!(score(&evening, utc2()), 10);
    }

    #[test]
    fn sum_rounds_to_nearest_score() {
        // wind 12 → 8, rain 0.2 → 5, temp 28 → 6, humidity 90 → 3; 22 / 3.5 = 6.29
        let sample = HourlySample {
            wind_speed: Some(12.0),
            rain_mm: Some(0.2),
            temp: Some(28.0),
            humidity: Some(90.0),
            ..calm(12)
        };
        assert_eq!(score(&sample, utc2()), 6);

        // wind 22 → 4, rain 0.7 → 2, temp 10 → 4, humidity 85 → 3; 13 / 3.5 = 3.71
        let sample = HourlySample {
            wind_speed: Some(22.0),
            rain_mm: Some(0.7),
            temp: Some(10.0),
            humidity: Some(85.0),
            ..calm(12)
        };
        assert_eq!(score(&sample, utc2()), 4);
    }

    #[test]
    fn missing_values_take_worst_band() {
        let sample = HourlySample {
            dt: local(12),
            ..Default::default()
        };
        // 0 + 0 + 0 + 3 = 3; 3 / 3.5 = 0.86
        assert_eq!(score(&sample, utc2()), 1);

        let nan = HourlySample {
            wind_speed: Some(f64::NAN),
            ..calm(12)
        };
        // 0 + 10 + 10 + 5 = 25; 25 / 3.5 = 7.14
        assert_eq!(score(&nan, utc2()), 7);
    }

    #[test]
    fn score_never_exceeds_max() {
        for wind in [0.0, 9.9, 14.0, 19.0, 24.0, 29.0, 40.0] {
            for rain in [0.0, 0.3, 0.9, 3.0] {
                for temp in [-5.0, 5.0, 10.0, 20.0, 28.0, 33.0, 38.0, 45.0] {
                    let sample = HourlySample {
                        wind_speed: Some(wind),
                        rain_mm: Some(rain),
                        temp: Some(temp),
                        ..calm(12)
                    };
                    assert!(score(&sample, utc2()) <= MAX_SCORE);
                }
            }
        }
    }
}
