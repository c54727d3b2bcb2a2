//! Definitions of time on the beat grid.
//!
//! Quantized positions are exact rationals, so gap comparisons against rule
//! thresholds such as `4/8` never suffer from floating point drift.

use num::{ToPrimitive, rational::Ratio};

/// Exact position or length in beats.
pub type Beat = Ratio<i64>;

/// Beats in one measure. Every measure is a 4/4 bar.
pub const BEATS_PER_MEASURE: i64 = 4;

/// Creates a [`Beat`] from a whole number of beats.
#[must_use]
pub fn whole_beats(beats: i64) -> Beat {
    Beat::from_integer(beats)
}

/// Converts a [`Beat`] into `f64` for statistics and preview timings.
#[must_use]
pub fn beat_to_f64(beat: Beat) -> f64 {
    beat.to_f64().unwrap_or(f64::NAN)
}

/// Index of the measure containing `beat`.
#[must_use]
pub fn measure_of(beat: Beat) -> i64 {
    (beat / BEATS_PER_MEASURE).floor().to_integer()
}

/// Converts seconds into beats under a constant `bpm`.
#[must_use]
pub fn seconds_to_beats(seconds: f64, bpm: f64) -> f64 {
    seconds * (bpm / 60.0)
}

/// Length of one `1/denominator` note of a 4/4 measure, in beats.
///
/// For example, an 8th note is half a beat.
#[must_use]
pub fn note_length(denominator: u32) -> Beat {
    Beat::new(BEATS_PER_MEASURE, i64::from(denominator))
}
