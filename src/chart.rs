//! Label and series arrays handed to the renderer.

use crate::days::DayBuckets;
use crate::{InterpolatedTidePoint, ScoredHour};
use chrono::FixedOffset;

/// Per-hour series for one day's weather charts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayChart {
    /// `HH:00` local labels
    pub labels: Vec<String>,
    pub score: Vec<u8>,
    pub temp: Vec<Option<f64>>,
    pub rain_mm: Vec<Option<f64>>,
    pub clouds: Vec<Option<f64>>,
    pub wind_speed: Vec<Option<f64>>,
    pub humidity: Vec<Option<f64>>,
}

impl DayChart {
    pub fn from_hours(hours: &[ScoredHour]) -> Self {
        let mut chart = DayChart::default();
        for hour in hours {
            chart.labels.push(hour.date.format("%H:00").to_string());
            chart.score.push(hour.score);
            chart.temp.push(hour.sample.temp);
            chart.rain_mm.push(hour.sample.rain_mm);
            chart.clouds.push(hour.sample.clouds);
            chart.wind_speed.push(hour.sample.wind_speed);
            chart.humidity.push(hour.sample.humidity);
        }
        chart
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One button in the day selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarouselButton {
    pub key: String,
    /// e.g. `Thu 16`
    pub label: String,
    /// Peak score of the day
    pub peak: u8,
}

/// Day selector buttons, in bucket order.
pub fn carousel(days: &DayBuckets) -> Vec<CarouselButton> {
    days.iter()
        .filter_map(|bucket| {
            let first = bucket.hours.first()?;
            Some(CarouselButton {
                key: bucket.key.clone(),
                label: first.date.format("%a %-d").to_string(),
                peak: bucket.representative_score(),
            })
        })
        .collect()
}

/// Tide curve as `(HH:MM local, height)` pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TideChart {
    pub labels: Vec<String>,
    pub heights: Vec<f64>,
}

impl TideChart {
    pub fn from_points(points: &[InterpolatedTidePoint], offset: FixedOffset) -> Self {
        let (labels, heights): (Vec<String>, Vec<f64>) = points
            .iter()
            .map(|p| {
                (
                    p.time.with_timezone(&offset).format("%H:%M").to_string(),
                    p.height_m,
                )
            })
            .unzip();
        TideChart { labels, heights }
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{days, time_bucket, HourlySample};
    use chrono::{DateTime, Utc};

    fn utc2() -> FixedOffset {
        time_bucket::offset_from_minutes(120).unwrap()
    }

    fn ts(rfc3339: &str) -> i64 {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().timestamp()
    }

    fn hours() -> Vec<HourlySample> {
        vec![
            HourlySample {
                dt: ts("2025-01-16T07:00:00Z"),
                temp: Some(21.0),
                wind_speed: Some(8.0),
                rain_mm: Some(0.0),
                humidity: Some(60.0),
                ..Default::default()
            },
            HourlySample {
                dt: ts("2025-01-16T10:00:00Z"),
                temp: Some(26.5),
                wind_speed: Some(18.0),
                ..Default::default()
            },
            HourlySample {
                dt: ts("2025-01-17T10:00:00Z"),
                temp: Some(19.0),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn day_chart_uses_local_labels() {
        let buckets = days::group_by_day(&hours(), utc2());
        let chart = DayChart::from_hours(buckets.hours("2025-01-16"));

        assert_eq!(chart.labels, ["09:00", "12:00"]);
        assert_eq!(chart.temp, [Some(21.0), Some(26.5)]);
        assert_eq!(chart.rain_mm, [Some(0.0), None]);
        assert_eq!(chart.score.len(), 2);
    }

    #[test]
    fn carousel_has_one_button_per_day() {
        let buckets = days::group_by_day(&hours(), utc2());
        let buttons = carousel(&buckets);

        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0].key, "2025-01-16");
        assert_eq!(buttons[0].label, "Thu 16");
        assert_eq!(buttons[0].peak, 10);
        assert_eq!(buttons[1].label, "Fri 17");
    }

    #[test]
    fn tide_chart_pairs_labels_and_heights() {
        let points = [InterpolatedTidePoint {
            time: DateTime::parse_from_rfc3339("2025-01-16T04:15:00Z")
                .unwrap()
                .with_timezone(&Utc),
            height_m: 1.25,
        }];
        let chart = TideChart::from_points(&points, utc2());
        assert_eq!(chart.labels, ["06:15"]);
        assert_eq!(chart.heights, [1.25]);
    }
}
