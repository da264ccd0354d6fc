//! # Tide Curve Interpolation
//!
//! Tide providers only publish extrema: the instant and height of each high
//! and low water. The dashboard draws a continuous curve, so this module
//! fills in the gaps for a selected local day.
//!
//! ## Window Selection
//! For a day `[start, end)` the curve is built from:
//! - the last extremum strictly before `start`
//! - every extremum inside the day
//! - the first extremum at or after `end`
//!
//! Including one point on either side lets the curve run edge to edge
//! instead of starting at the first high or low of the day.
//!
//! ## Interpolation Algorithm
//! Between two consecutive extrema the height follows a raised cosine:
//! ```text
//! phase  = (t - t1) / (t2 - t1)
//! height = h1 + (h2 - h1) * (0.5 - 0.5 * cos(phase * π))
//! ```
//! The curve is flat at each extremum and steepest half way between them,
//! which is the shape of a real tide. Points are emitted every 15 minutes.
//! Each segment includes both of its end points, so a shared extremum appears
//! twice in the output.
//!
//! ## Merging
//! The tide refresh appends new provider data to the existing file with
//! [`merge_extrema`]: entries are keyed by `(time, type)`, newer values win,
//! and the result is sorted by time.

use crate::{time_bucket, InterpolatedTidePoint, TideExtremum, TideKind};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Spacing of interpolated points, in minutes.
pub const STEP_MINUTES: i64 = 15;

/// Sort extrema by time, keeping input order for equal instants.
pub fn sorted(extrema: &[TideExtremum]) -> Vec<TideExtremum> {
    let mut sorted = extrema.to_vec();
    sorted.sort_by_key(|e| e.time);
    sorted
}

/// Extrema bounding and inside the local day named by `day_key`.
///
/// Returns an empty list when the key does not parse.
pub fn window_points(
    extrema: &[TideExtremum],
    day_key: &str,
    offset: FixedOffset,
) -> Vec<TideExtremum> {
    let Some((start, end)) = time_bucket::day_window(day_key, offset) else {
        return Vec::new();
    };
    let sorted = sorted(extrema);

    let before = sorted.iter().rev().find(|e| e.time < start);
    let after = sorted.iter().find(|e| e.time >= end);
    let core = sorted.iter().filter(|e| start <= e.time && e.time < end);

    before.into_iter().chain(core).chain(after).cloned().collect()
}

/// Continuous 15-minute tide curve for one local day.
///
/// An empty result means there is not enough data to draw the day.
///
/// # Example
/// ```
/// use beach_conditions_lib::{tide_data, time_bucket, TideExtremum};
///
/// let offset = time_bucket::offset_from_minutes(120).unwrap();
/// let extrema: Vec<TideExtremum> = serde_json::from_str(r#"[
///     { "time": "2025-01-15T22:00:00Z", "height_m": 0.5, "type": "low" },
///     { "time": "2025-01-16T04:00:00Z", "height_m": 1.5, "type": "high" }
/// ]"#).unwrap();
///
/// let curve = tide_data::interpolate_day(&extrema, "2025-01-16", offset);
/// assert_eq!(curve.len(), 25);
/// assert!((curve[12].height_m - 1.0).abs() < 1e-9);
/// ```
pub fn interpolate_day(
    extrema: &[TideExtremum],
    day_key: &str,
    offset: FixedOffset,
) -> Vec<InterpolatedTidePoint> {
    let points = window_points(extrema, day_key, offset);
    if points.len() < 2 {
        return Vec::new();
    }

    points
        .windows(2)
        .flat_map(|pair| interpolate_segment(&pair[0], &pair[1]))
        .collect()
}

/// Raised-cosine points from `from` to `to`, both ends included.
pub fn interpolate_segment(from: &TideExtremum, to: &TideExtremum) -> Vec<InterpolatedTidePoint> {
    let span = (to.time - from.time).num_seconds();
    if span <= 0 {
        return vec![InterpolatedTidePoint {
            time: from.time,
            height_m: from.height_m,
        }];
    }

    let step = Duration::minutes(STEP_MINUTES);
    let mut points = Vec::with_capacity((span / step.num_seconds()) as usize + 2);
    let mut t = from.time;
    while t <= to.time {
        points.push(point_at(from, to, t, span));
        t = match t.checked_add_signed(step) {
            Some(next) => next,
            None => break,
        };
    }
    if points.last().is_some_and(|p| p.time < to.time) {
        points.push(InterpolatedTidePoint {
            time: to.time,
            height_m: to.height_m,
        });
    }
    points
}

fn point_at(
    from: &TideExtremum,
    to: &TideExtremum,
    t: DateTime<Utc>,
    span_secs: i64,
) -> InterpolatedTidePoint {
    let phase = (t - from.time).num_seconds() as f64 / span_secs as f64;
    let blend = 0.5 - 0.5 * (phase * PI).cos();
    InterpolatedTidePoint {
        time: t,
        height_m: from.height_m + (to.height_m - from.height_m) * blend,
    }
}

/// Merge freshly fetched extrema into an existing list.
///
/// Entries with the same instant and type are replaced by the incoming one.
pub fn merge_extrema(existing: Vec<TideExtremum>, incoming: Vec<TideExtremum>) -> Vec<TideExtremum> {
    let mut by_key: HashMap<(DateTime<Utc>, TideKind), TideExtremum> = HashMap::new();
    for ext in existing.into_iter().chain(incoming) {
        by_key.insert((ext.time, ext.kind), ext);
    }

    let mut merged: Vec<_> = by_key.into_values().collect();
    merged.sort_by_key(|e| (e.time, e.kind == TideKind::High));
    merged
}
