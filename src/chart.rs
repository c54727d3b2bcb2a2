//! The generated step chart and the pipeline that builds it.
//!
//! A [`Chart`] is a list of [`Measure`]s, each holding as many [`Tick`]s as its resolved
//! subdivision needs. A tick is one row of the 4 lanes.
//!
//! The building blocks, leaf-first:
//!
//! - [`quantize`] snaps source times onto the beat grid and resolves the subdivision of each
//!   measure,
//! - [`aggregate`] turns the notes sharing a timestamp into candidate lanes and layers mines,
//! - [`placement`] applies the foot placement rules, statefully across the whole chart,
//! - [`difficulty`] rates the result,
//! - [`assemble`] drives them measure by measure.

pub mod aggregate;
pub mod assemble;
pub mod difficulty;
pub mod placement;
pub mod quantize;
pub mod rng;

use crate::song::{LANE_COUNT, Lane};

/// State of one lane in a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    /// Nothing to do.
    #[default]
    Empty,
    /// A step.
    Tap,
    /// A mine to avoid.
    Mine,
}

impl Slot {
    /// Character of the slot in the `.sm` note data.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Empty => '0',
            Self::Tap => '1',
            Self::Mine => 'M',
        }
    }
}

/// One row of the 4 lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub [Slot; LANE_COUNT]);

impl Tick {
    /// A row with nothing in it.
    pub const EMPTY: Self = Self([Slot::Empty; LANE_COUNT]);

    /// Creates a row with taps on `lanes`.
    #[must_use]
    pub fn from_taps(lanes: &[Lane]) -> Self {
        let mut tick = Self::EMPTY;
        for &lane in lanes {
            tick.set(lane, Slot::Tap);
        }
        tick
    }

    /// Gets the slot of `lane`.
    #[must_use]
    pub const fn get(&self, lane: Lane) -> Slot {
        self.0[lane.index()]
    }

    /// Sets the slot of `lane`.
    pub const fn set(&mut self, lane: Lane, slot: Slot) {
        self.0[lane.index()] = slot;
    }

    /// Lanes holding a tap, from left to right.
    pub fn taps(&self) -> impl Iterator<Item = Lane> + '_ {
        Lane::ALL
            .into_iter()
            .filter(|&lane| self.get(lane) == Slot::Tap)
    }

    /// Number of taps in the row.
    #[must_use]
    pub fn tap_count(&self) -> usize {
        self.0.iter().filter(|&&slot| slot == Slot::Tap).count()
    }

    /// Number of mines in the row.
    #[must_use]
    pub fn mine_count(&self) -> usize {
        self.0.iter().filter(|&&slot| slot == Slot::Mine).count()
    }

    /// Whether the row has at least one tap.
    #[must_use]
    pub fn has_tap(&self) -> bool {
        self.0.contains(&Slot::Tap)
    }

    /// Whether the row has 2 or more taps.
    #[must_use]
    pub fn is_jump(&self) -> bool {
        self.tap_count() > 1
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;
        self.0.iter().try_for_each(|slot| f.write_char(slot.as_char()))
    }
}

/// 4 beats of ticks at a locally resolved subdivision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measure {
    /// Rows of the measure, evenly spaced.
    pub ticks: Vec<Tick>,
}

impl Measure {
    /// A measure of 4 empty quarter-note rows.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            ticks: vec![Tick::EMPTY; 4],
        }
    }

    /// Number of rows, which is the subdivision of the measure.
    #[must_use]
    pub fn resolution(&self) -> usize {
        self.ticks.len()
    }
}

/// Counts of the note types in a chart.
///
/// A row counts once as `tap` when it has any tap, a row of 2 taps additionally counts as a
/// `jump`, and a row of 3 or more taps counts as a `jump` and as `hands`. Every mine counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartStats {
    /// Rows with at least one tap.
    pub tap: u32,
    /// Rows with 2 or more taps.
    pub jump: u32,
    /// Hold notes. Holds are never generated.
    pub hold: u32,
    /// Mines.
    pub mine: u32,
    /// Rows with 3 or more taps.
    pub hands: u32,
}

impl ChartStats {
    /// Adds a row to the counts.
    pub fn record(&mut self, tick: &Tick) {
        self.mine += tick.mine_count() as u32;
        match tick.tap_count() {
            0 => {}
            1 => self.tap += 1,
            2 => {
                self.tap += 1;
                self.jump += 1;
            }
            _ => {
                self.tap += 1;
                self.jump += 1;
                self.hands += 1;
            }
        }
    }

    /// Counts every row of `measures`.
    #[must_use]
    pub fn from_measures(measures: &[Measure]) -> Self {
        let mut stats = Self::default();
        for tick in measures.iter().flat_map(|measure| &measure.ticks) {
            stats.record(tick);
        }
        stats
    }
}

/// Compensation subtracted from every preview timestamp for the output latency of hit sounds.
pub const SOUND_DELAY_COMPENSATION_SECONDS: f64 = 0.05;

/// A generated step chart of one difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chart {
    /// Difficulty label such as `Hard` or `Challenge_Edit`.
    pub name: String,
    /// Difficulty rating.
    pub meter: u32,
    /// Note data.
    pub measures: Vec<Measure>,
    /// Counts of the note types.
    pub stats: ChartStats,
}

impl Chart {
    /// The difficulty written to the `.sm` file: the label up to the first `_`.
    #[must_use]
    pub fn difficulty(&self) -> &str {
        self.name.split('_').next().unwrap_or(&self.name)
    }

    /// Iterates over all rows with their positions in beats.
    pub fn ticks_with_beats(&self) -> impl Iterator<Item = (f64, &Tick)> + '_ {
        self.measures
            .iter()
            .enumerate()
            .flat_map(|(index, measure)| {
                let step = 4.0 / measure.resolution() as f64;
                measure
                    .ticks
                    .iter()
                    .enumerate()
                    .map(move |(row, tick)| (index as f64 * 4.0 + row as f64 * step, tick))
            })
    }

    /// Times in seconds at which the rows holding a tap should sound, for a preview playback.
    ///
    /// The first row sounds at `-offset_seconds`, and every timestamp is advanced by
    /// [`SOUND_DELAY_COMPENSATION_SECONDS`].
    #[must_use]
    pub fn note_timestamps(&self, bpm: f64, offset_seconds: f64) -> Vec<f64> {
        let seconds_per_beat = 60.0 / bpm;
        self.ticks_with_beats()
            .filter(|(_, tick)| tick.has_tap())
            .map(|(beat, _)| {
                beat * seconds_per_beat - offset_seconds - SOUND_DELAY_COMPENSATION_SECONDS
            })
            .collect()
    }
}

/// Direction to shift the whole chart in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShiftDirection {
    /// Notes come later.
    Forward,
    /// Notes come earlier.
    Backward,
}

/// Timing difference in seconds introduced by shifting every note by one `1/subdivision` note.
///
/// A `subdivision` of 0 means no shift. The result can be added to
/// [`crate::config::StepConfig::additional_offset_seconds`].
#[must_use]
pub fn shift_timing_difference(subdivision: u32, direction: ShiftDirection, bpm: f64) -> f64 {
    if subdivision == 0 {
        return 0.0;
    }
    let seconds_per_beat = 60.0 / bpm;
    let shift = 4.0 / f64::from(subdivision) * seconds_per_beat;
    match direction {
        ShiftDirection::Forward => shift,
        ShiftDirection::Backward => -shift,
    }
}
