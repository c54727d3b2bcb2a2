//! Rating of a generated chart.
//!
//! The meter grows with the square root of the weighted note density. 300 notes per minute
//! rates 11, and a jump takes about as much energy as 3 taps.

use super::ChartStats;

/// Weighted notes per minute rated as [`REFERENCE_METER`].
pub const REFERENCE_NOTES_PER_MINUTE: f64 = 300.0;

/// Meter of a chart at [`REFERENCE_NOTES_PER_MINUTE`].
pub const REFERENCE_METER: f64 = 11.0;

/// Weighted note count of `stats`, counting a jump row as 3 more notes and a hands row as 4 more.
#[must_use]
pub fn weighted_notes(stats: &ChartStats) -> f64 {
    f64::from(stats.tap) + 3.0 * f64::from(stats.jump) + 4.0 * f64::from(stats.hands)
}

/// Rates a chart of `stats` whose last source note is at `last_time` beats under `bpm`.
///
/// The meter is at least 1. A song without a positive length rates 1.
#[must_use]
pub fn meter(stats: &ChartStats, last_time: f64, bpm: f64) -> u32 {
    if !last_time.is_finite() || last_time <= 0.0 || bpm <= 0.0 {
        return 1;
    }
    let minutes = last_time / bpm;
    let notes_per_minute = weighted_notes(stats) / minutes;
    let meter = (REFERENCE_METER * (notes_per_minute / REFERENCE_NOTES_PER_MINUTE).sqrt()).round();
    if meter.is_finite() && meter >= 1.0 {
        meter as u32
    } else {
        1
    }
}
