//! # Local Day Bucketing
//!
//! Converts absolute instants into calendar days under a fixed UTC offset.
//! The offset is passed explicitly so results never depend on the timezone of
//! the machine doing the rendering.
//!
//! Invalid timestamps come back as `None`; callers drop those samples rather
//! than failing the whole load.

use crate::HourlySample;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike, Utc};

/// Day key format, e.g. `2025-01-16`.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Build a fixed offset from minutes east of UTC.
///
/// Returns `None` for offsets of a day or more.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

/// Local calendar date of an instant.
pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Local hour of day (0-23) for an epoch-seconds timestamp.
pub fn local_hour(epoch_secs: i64, offset: FixedOffset) -> Option<u32> {
    DateTime::from_timestamp(epoch_secs, 0).map(|dt| dt.with_timezone(&offset).hour())
}

/// Calendar day key of a sample, or `None` if its timestamp is unusable.
///
/// ```
/// use beach_conditions_lib::{time_bucket, HourlySample};
///
/// let offset = time_bucket::offset_from_minutes(120).unwrap();
/// // 2025-01-15T22:30:00Z is already the 16th in UTC+2
/// let sample = HourlySample { dt: 1736980200, ..Default::default() };
///
/// assert_eq!(time_bucket::day_key_of(&sample, offset).as_deref(), Some("2025-01-16"));
/// ```
pub fn day_key_of(sample: &HourlySample, offset: FixedOffset) -> Option<String> {
    sample
        .instant()
        .map(|dt| day_key(local_date(dt, offset)))
}

/// Format a local date as a day key.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a day key back into a date.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()
}

/// Absolute instant of local midnight at the start of `date`.
///
/// `None` when that instant falls outside chrono's representable range.
pub fn local_midnight(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let local = date.and_hms_opt(0, 0, 0)?;
    let utc = local.checked_sub_signed(Duration::seconds(offset.local_minus_utc().into()))?;
    Some(DateTime::from_naive_utc_and_offset(utc, Utc))
}

/// Midnight of "today" (local) expressed as an absolute instant.
pub fn today_cutoff(now: DateTime<Utc>, offset: FixedOffset) -> Option<DateTime<Utc>> {
    local_midnight(local_date(now, offset), offset)
}

/// `[start, end)` of the local day named by `key`.
///
/// `None` for keys that do not parse or whose day runs past the edge of
/// chrono's range.
pub fn day_window(key: &str, offset: FixedOffset) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = local_midnight(parse_day_key(key)?, offset)?;
    let end = start.checked_add_signed(Duration::hours(24))?;
    Some((start, end))
}

/// Whether the sample falls at or after `cutoff`. Unusable timestamps are
/// never "after" anything.
pub fn is_at_or_after(sample: &HourlySample, cutoff: DateTime<Utc>) -> bool {
    sample.instant().is_some_and(|dt| dt >= cutoff)
}
