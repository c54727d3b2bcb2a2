//! Snapping source times onto the beat grid.
//!
//! Source maps are often not perfectly timed, so every note time is first snapped to the nearest
//! fraction of a beat reachable at the configured granularity. After that, each measure gets the
//! smallest subdivision able to place all of its snapped notes exactly.

use num::{CheckedAdd, Integer, ToPrimitive, Zero};

use crate::{
    beat::{BEATS_PER_MEASURE, Beat, beat_to_f64, whole_beats},
    config::NoteGap,
};

/// Subdivisions a measure may be resolved to, from the coarsest.
pub const MEASURE_RESOLUTIONS: [u32; 10] = [4, 8, 12, 16, 24, 32, 48, 64, 96, 128];

/// The resolution of a measure without any off-beat note.
pub const MIN_MEASURE_RESOLUTION: u32 = 4;

/// Fractions of a beat, `0` to `1` inclusive, reachable by `resolution` rows per measure.
fn beat_fractions(resolution: u32) -> impl Iterator<Item = Beat> {
    let rows_per_beat = i64::from(resolution) / BEATS_PER_MEASURE;
    (0..=rows_per_beat).map(move |row| Beat::new(row, rows_per_beat))
}

/// Snaps note times to a grid of beat fractions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantizer {
    snap_table: Vec<Beat>,
}

impl Quantizer {
    /// Creates a quantizer snapping to `granularity`.
    ///
    /// Triplet-based granularities also keep the straight grid below them: 12th notes keep 8th
    /// notes, 24th notes keep 16th notes and 32nd notes keep 24th notes.
    #[must_use]
    pub fn new(granularity: NoteGap) -> Self {
        let absorbed = match granularity {
            NoteGap::Twelfth => Some(NoteGap::Eighth),
            NoteGap::TwentyFourth => Some(NoteGap::Sixteenth),
            NoteGap::ThirtySecond => Some(NoteGap::TwentyFourth),
            _ => None,
        };
        let mut snap_table: Vec<Beat> = beat_fractions(granularity.denominator())
            .chain(absorbed.into_iter().flat_map(|gap| beat_fractions(gap.denominator())))
            .collect();
        snap_table.sort();
        snap_table.dedup();
        Self { snap_table }
    }

    /// Fractions of a beat that notes are snapped to, in ascending order.
    #[must_use]
    pub fn snap_table(&self) -> &[Beat] {
        &self.snap_table
    }

    /// Snaps `time` in beats to the nearest grid position.
    ///
    /// A time already on the grid is returned unchanged. On a tie between two grid positions, the
    /// earlier one wins. A time just before the next beat may snap onto it.
    ///
    /// Returns `None` when the snapped beat does not fit in an `i64` ratio.
    #[must_use]
    pub fn quantize(&self, time: f64) -> Option<Beat> {
        let floor = time.floor();
        let whole = floor.to_i64()?;
        let fraction = time - floor;
        let delta = |candidate: &Beat| (beat_to_f64(*candidate) - fraction).abs();
        let nearest = self
            .snap_table
            .iter()
            .min_by(|a, b| delta(a).total_cmp(&delta(b)))
            .copied()
            .unwrap_or_else(Beat::zero);
        whole_beats(whole).checked_add(&nearest)
    }
}

/// The smallest measure resolution placing `beat` exactly on a row.
///
/// Falls back to the finest resolution when none does.
#[must_use]
pub fn resolution_for(beat: Beat) -> u32 {
    let fraction = beat.fract();
    MEASURE_RESOLUTIONS
        .into_iter()
        .find(|&resolution| {
            (fraction * i64::from(resolution) / BEATS_PER_MEASURE).is_integer()
        })
        .unwrap_or(MEASURE_RESOLUTIONS[MEASURE_RESOLUTIONS.len() - 1])
}

/// The resolution of a measure holding notes at `beats`.
///
/// It is the least common multiple of each note's own resolution, so it is always a multiple
/// of [`MIN_MEASURE_RESOLUTION`].
#[must_use]
pub fn measure_resolution(beats: impl IntoIterator<Item = Beat>) -> u32 {
    beats
        .into_iter()
        .map(resolution_for)
        .fold(MIN_MEASURE_RESOLUTION, |acc, resolution| acc.lcm(&resolution))
}

/// Position of row `row` in measure `measure` at `resolution` rows per measure.
#[must_use]
pub fn row_beat(measure: i64, row: u32, resolution: u32) -> Beat {
    whole_beats(measure * BEATS_PER_MEASURE)
        + Beat::new(BEATS_PER_MEASURE * i64::from(row), i64::from(resolution))
}
