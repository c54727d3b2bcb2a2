//! Building a whole chart from the notes of one difficulty.
//!
//! Notes are shifted by the configured offset, snapped to the beat grid and grouped by measure.
//! Each measure gets the coarsest subdivision placing all of its notes exactly, and its rows are
//! placed in ascending order by a single [`PlacementEngine`] running through the whole chart.

use std::collections::BTreeMap;

use thiserror::Error;

use super::{
    Chart, ChartStats, Measure, Tick,
    aggregate::aggregate,
    difficulty::meter,
    placement::{PlacementEngine, UnsettledPlacement},
    quantize::{Quantizer, measure_resolution, row_beat},
    rng::Rng,
};
use crate::{
    beat::{Beat, measure_of, seconds_to_beats},
    config::StepConfig,
    song::{DifficultyMap, RawNoteEvent, SongMetadata},
};

/// Difficulty labels of the output, from the hardest.
pub const LEVELS: [&str; 5] = ["Challenge", "Hard", "Medium", "Easy", "Beginner"];

/// Maximum number of charts generated for a song.
pub const MAX_CHARTS: usize = LEVELS.len() * 2;

/// Latest beat a note may land on after the offset. Past it the note is discarded.
///
/// It is over 50 hours at 300 bpm, far beyond any song, while keeping the measure list small.
pub const MAX_EVENT_BEAT: f64 = 1_048_576.0;

/// Notes that could not be placed in the chart.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BuildWarning {
    /// The note lands before the first beat after applying the offset, and was discarded.
    #[error("note at beat {time} lands at beat {shifted} after the offset, before the chart starts")]
    EventBeforeStart {
        /// Time of the note in the source, in beats.
        time: f64,
        /// Time after the offset, in beats.
        shifted: f64,
    },
    /// The note time is not a finite number, and was discarded.
    #[error("note time is not finite: {0}")]
    NonFiniteTime(f64),
    /// The note lands after [`MAX_EVENT_BEAT`], and was discarded.
    #[error("note at beat {time} lands at beat {shifted} after the offset, too far to chart")]
    EventOutOfRange {
        /// Time of the note in the source, in beats.
        time: f64,
        /// Time after the offset, in beats.
        shifted: f64,
    },
}

/// Output of [`build_chart`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ChartBuildOutput {
    /// The generated chart.
    pub chart: Chart,
    /// Notes that were discarded.
    pub warnings: Vec<BuildWarning>,
}

/// Labels of `count` charts, ordered from the chart with the most notes.
///
/// Up to 5 charts get the plain labels. Every chart beyond 5 adds an `_Edit` variant of a label,
/// interleaved before it, so 7 charts are labeled `Challenge_Edit, Challenge, Hard_Edit, Hard,
/// Medium, Easy, Beginner`. At most [`MAX_CHARTS`] labels are returned.
#[must_use]
pub fn difficulty_labels(count: usize) -> Vec<String> {
    let mut labels: Vec<String> = LEVELS.iter().map(ToString::to_string).collect();
    let surplus = count.saturating_sub(LEVELS.len()).min(LEVELS.len());
    for (index, level) in LEVELS.iter().enumerate().take(surplus) {
        labels.insert(index * 2, format!("{level}_Edit"));
    }
    labels.truncate(count);
    labels
}

/// Orders `maps` from the most notes and keeps at most [`MAX_CHARTS`] of them.
///
/// Maps with as many notes keep their input order.
#[must_use]
pub fn order_maps(maps: &[DifficultyMap]) -> Vec<&DifficultyMap> {
    let mut ordered: Vec<_> = maps.iter().collect();
    ordered.sort_by(|a, b| b.notes.len().cmp(&a.notes.len()));
    ordered.truncate(MAX_CHARTS);
    ordered
}

/// Snaps and groups note events by their position on the grid.
fn snap_events(
    notes: &[RawNoteEvent],
    quantizer: &Quantizer,
    offset_beats: f64,
    warnings: &mut Vec<BuildWarning>,
) -> BTreeMap<Beat, Vec<RawNoteEvent>> {
    let mut events: BTreeMap<Beat, Vec<RawNoteEvent>> = BTreeMap::new();
    for note in notes {
        let shifted = note.time + offset_beats;
        if !shifted.is_finite() {
            warnings.push(BuildWarning::NonFiniteTime(note.time));
            continue;
        }
        let Some(beat) = quantizer
            .quantize(shifted)
            .filter(|_| shifted <= MAX_EVENT_BEAT)
        else {
            log::trace!("discarding note at beat {} out of range", note.time);
            warnings.push(BuildWarning::EventOutOfRange {
                time: note.time,
                shifted,
            });
            continue;
        };
        if beat < Beat::default() {
            log::trace!("discarding note at beat {} before the start", note.time);
            warnings.push(BuildWarning::EventBeforeStart {
                time: note.time,
                shifted,
            });
            continue;
        }
        events.entry(beat).or_default().push(*note);
    }
    events
}

/// Builds the chart named `name` from `map`.
///
/// The meter is rated against the latest note time of `map` before the offset.
///
/// # Errors
///
/// Returns [`UnsettledPlacement`] if the placement rules do not settle on some row.
pub fn build_chart(
    song: &SongMetadata,
    map: &DifficultyMap,
    config: &StepConfig,
    name: impl Into<String>,
    rng: impl Rng,
) -> Result<ChartBuildOutput, UnsettledPlacement> {
    let name = name.into();
    let mut warnings = Vec::new();
    let quantizer = Quantizer::new(config.auto_snap);
    let offset_beats = seconds_to_beats(config.additional_offset_seconds, song.bpm);
    let events = snap_events(&map.notes, &quantizer, offset_beats, &mut warnings);

    let mut by_measure: BTreeMap<i64, Vec<Beat>> = BTreeMap::new();
    for &beat in events.keys() {
        by_measure.entry(measure_of(beat)).or_default().push(beat);
    }
    let measure_count = by_measure.keys().next_back().map_or(0, |&last| last + 1);

    let mut engine = PlacementEngine::new(config, rng);
    let mut measures = Vec::with_capacity(measure_count as usize);
    for index in 0..measure_count {
        let Some(beats) = by_measure.get(&index) else {
            measures.push(Measure::empty());
            continue;
        };
        let resolution = measure_resolution(beats.iter().copied());
        let mut ticks = Vec::with_capacity(resolution as usize);
        for row in 0..resolution {
            let beat = row_beat(index, row, resolution);
            let tick = match events.get(&beat) {
                Some(notes) => engine.place(beat, &aggregate(notes, config.jump_mode))?,
                None => Tick::EMPTY,
            };
            ticks.push(tick);
        }
        measures.push(Measure { ticks });
    }
    if measures.is_empty() {
        measures.push(Measure::empty());
    }

    let stats = ChartStats::from_measures(&measures);
    let meter = meter(&stats, map.last_time().unwrap_or(0.0), song.bpm);
    log::debug!(
        "built chart {name}: {} measures, meter {meter}, {stats:?}, {} notes discarded",
        measures.len(),
        warnings.len(),
    );

    Ok(ChartBuildOutput {
        chart: Chart {
            name,
            meter,
            measures,
            stats,
        },
        warnings,
    })
}
