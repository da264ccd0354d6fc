//! # Day Aggregation
//!
//! Groups scored hours into local calendar days for the day carousel.
//! Buckets keep the order in which days are first seen, and hours inside a
//! bucket keep their input order. A day's headline number is its peak score:
//! one good window is enough reason to head to the beach.

use crate::{scoring, time_bucket, HourlySample, ScoredHour};
use chrono::{DateTime, FixedOffset, Utc};

/// All hours that fall on one local day.
#[derive(Clone, Debug, PartialEq)]
pub struct DayBucket {
    /// Day key, `YYYY-MM-DD`
    pub key: String,
    pub hours: Vec<ScoredHour>,
}

impl DayBucket {
    /// Peak score across the day's hours, 0 for an empty bucket.
    pub fn representative_score(&self) -> u8 {
        representative_score(&self.hours)
    }
}

/// Ordered day buckets produced by [`group_by_day`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayBuckets {
    buckets: Vec<DayBucket>,
}

impl DayBuckets {
    /// Hours for `key`, or an empty slice when the day has no data.
    pub fn hours(&self, key: &str) -> &[ScoredHour] {
        self.get(key).map(|b| b.hours.as_slice()).unwrap_or(&[])
    }

    pub fn get(&self, key: &str) -> Option<&DayBucket> {
        self.buckets.iter().find(|b| b.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DayBucket> {
        self.buckets.iter()
    }

    pub fn first(&self) -> Option<&DayBucket> {
        self.buckets.first()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<'a> IntoIterator for &'a DayBuckets {
    type Item = &'a DayBucket;
    type IntoIter = std::slice::Iter<'a, DayBucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

/// Score a single sample, or `None` if its timestamp is unusable.
pub fn score_hour(sample: &HourlySample, offset: FixedOffset) -> Option<ScoredHour> {
    let date = sample.instant()?.with_timezone(&offset);
    Some(ScoredHour {
        sample: sample.clone(),
        date,
        score: scoring::score(sample, offset),
    })
}

/// Score every sample and bucket it by local day.
///
/// Samples with unusable timestamps are left out.
pub fn group_by_day(samples: &[HourlySample], offset: FixedOffset) -> DayBuckets {
    let mut buckets: Vec<DayBucket> = Vec::new();

    for sample in samples {
        let Some(hour) = score_hour(sample, offset) else {
            continue;
        };
        let key = time_bucket::day_key(hour.date.date_naive());

        match buckets.iter_mut().find(|b| b.key == key) {
            Some(bucket) => bucket.hours.push(hour),
            None => buckets.push(DayBucket {
                key,
                hours: vec![hour],
            }),
        }
    }

    DayBuckets { buckets }
}

/// Peak score of a run of hours.
pub fn representative_score(hours: &[ScoredHour]) -> u8 {
    hours.iter().map(|h| h.score).max().unwrap_or(0)
}

/// Samples on today's local date or later.
///
/// Earlier hours of today are kept; only previous days are dropped.
pub fn select_upcoming(
    samples: &[HourlySample],
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<HourlySample> {
    let Some(cutoff) = time_bucket::today_cutoff(now, offset) else {
        return Vec::new();
    };

    samples
        .iter()
        .filter(|s| time_bucket::is_at_or_after(s, cutoff))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc2() -> FixedOffset {
        time_bucket::offset_from_minutes(120).unwrap()
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample(rfc3339: &str, wind: f64) -> HourlySample {
        HourlySample {
            dt: at(rfc3339).timestamp(),
            wind_speed: Some(wind),
            rain_mm: Some(0.0),
            temp: Some(22.0),
            humidity: Some(50.0),
            ..Default::default()
        }
    }

    fn forecast() -> Vec<HourlySample> {
        vec![
            sample("2025-01-15T08:00:00Z", 5.0),  // 10:00 local, 15th
            sample("2025-01-15T14:00:00Z", 22.0), // 16:00 local, 15th
            sample("2025-01-15T22:30:00Z", 5.0),  // 00:30 local, 16th
            sample("2025-01-16T10:00:00Z", 12.0), // 12:00 local, 16th
            sample("2025-01-17T10:00:00Z", 40.0), // 12:00 local, 17th
        ]
    }

    #[test]
    fn groups_partition_input_in_order() {
        let days = group_by_day(&forecast(), utc2());

        let keys: Vec<_> = days.keys().collect();
        assert_eq!(keys, ["2025-01-15", "2025-01-16", "2025-01-17"]);

        let total: usize = days.iter().map(|d| d.hours.len()).sum();
        assert_eq!(total, forecast().len());

        let second: Vec<_> = days.hours("2025-01-16").iter().map(|h| h.sample.dt).collect();
        assert_eq!(second, [forecast()[2].dt, forecast()[3].dt]);
    }

    #[test]
    fn day_score_is_peak_not_mean() {
        let days = group_by_day(&forecast(), utc2());

        // 10 and (4+10+10+5)/3.5 = 8.29 → 8
        assert_eq!(days.get("2025-01-15").unwrap().representative_score(), 10);
        // night hour 0 and (8+10+10+5)/3.5 = 9.43 → 9
        assert_eq!(days.get("2025-01-16").unwrap().representative_score(), 9);
        // wind guard
        assert_eq!(days.get("2025-01-17").unwrap().representative_score(), 0);
    }

    #[test]
    fn unknown_day_has_no_hours() {
        let days = group_by_day(&forecast(), utc2());
        assert!(days.hours("2030-01-01").is_empty());
        assert_eq!(representative_score(&[]), 0);
    }

    #[test]
    fn unusable_timestamps_are_dropped() {
        let mut samples = forecast();
        samples.push(HourlySample {
            dt: i64::MIN,
            ..Default::default()
        });
        let days = group_by_day(&samples, utc2());
        let total: usize = days.iter().map(|d| d.hours.len()).sum();
        assert_eq!(total, forecast().len());
    }

    #[test]
    fn upcoming_keeps_all_of_today() {
        // 13:00 local on the 16th; the 00:30 hour is already past but kept
        let now = at("2025-01-16T11:00:00Z");
        let upcoming = select_upcoming(&forecast(), now, utc2());

        let dts: Vec<_> = upcoming.iter().map(|s| s.dt).collect();
        assert_eq!(dts, [forecast()[2].dt, forecast()[3].dt, forecast()[4].dt]);
    }

    #[test]
    fn upcoming_uses_local_day_boundary() {
        // 23:30Z on the 15th is already the 16th locally
        let now = at("2025-01-15T23:30:00Z");
        let upcoming = select_upcoming(&forecast(), now, utc2());
        assert_eq!(upcoming.len(), 3);
    }

    #[test]
    fn sample_at_local_midnight_is_upcoming() {
        let midnight = sample("2025-01-15T22:00:00Z", 5.0); // 00:00 local, 16th
        let just_before = sample("2025-01-15T21:59:59Z", 5.0);
        let now = at("2025-01-16T11:00:00Z");

        let cutoff = time_bucket::today_cutoff(now, utc2()).unwrap();
        assert_eq!(cutoff.timestamp(), midnight.dt);
        assert!(time_bucket::is_at_or_after(&midnight, cutoff));
        assert!(!time_bucket::is_at_or_after(&just_before, cutoff));

        let upcoming = select_upcoming(&[just_before, midnight.clone()], now, utc2());
        assert_eq!(upcoming, [midnight]);
    }
}
