//! Source-side data: song metadata and the note events of one difficulty.
//!
//! These are the inputs of [`crate::convert`]. The `saber` module produces them from Beat Saber
//! files, but any caller able to fill them in can drive the conversion.

use thiserror::Error;

/// Number of lanes of a `dance-single` chart, and of the source grid.
pub const LANE_COUNT: usize = 4;

/// One of the 4 horizontal positions a note or a step can occupy.
///
/// Lane 0 is the leftmost, lane 3 the rightmost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Lane(u8);

impl Lane {
    /// The leftmost lane, stepped on by the left foot.
    pub const LEFT: Self = Self(0);
    /// The rightmost lane, stepped on by the right foot.
    pub const RIGHT: Self = Self(3);
    /// All lanes from left to right.
    pub const ALL: [Self; LANE_COUNT] = [Self(0), Self(1), Self(2), Self(3)];

    /// Creates a lane if `index` is in `0..4`.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < LANE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Gets the index of the lane.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The next lane to the right, wrapping around to lane 0.
    #[must_use]
    pub const fn rotated(self) -> Self {
        Self((self.0 + 1) % LANE_COUNT as u8)
    }
}

/// Error type for `Lane::try_from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("lane index must be in 0..4: {0}")]
pub struct LaneOutOfRange(pub i64);

impl TryFrom<u8> for Lane {
    type Error = LaneOutOfRange;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(LaneOutOfRange(i64::from(value)))
    }
}

impl TryFrom<i64> for Lane {
    type Error = LaneOutOfRange;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(LaneOutOfRange(value))
    }
}

impl From<Lane> for u8 {
    fn from(value: Lane) -> Self {
        value.0
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The saber, and so the hand, that cuts a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hand {
    /// The red saber.
    Left,
    /// The blue saber.
    Right,
}

/// What a source event asks the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteKind {
    /// A note to be cut by the hand.
    Normal(Hand),
    /// A bomb, which becomes a mine in the step chart.
    Mine,
}

/// One note event of a source beatmap.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawNoteEvent {
    /// Position in beats from the start of the song. It may be off the beat grid.
    pub time: f64,
    /// Horizontal position.
    pub lane: Lane,
    /// Vertical position. Not used for placement.
    pub layer: i32,
    /// Direction of the cut. Not used for placement.
    pub cut_direction: i32,
    /// Normal note or mine.
    pub kind: NoteKind,
}

impl RawNoteEvent {
    /// Creates a note to be cut by `hand`, with a neutral layer and cut direction.
    #[must_use]
    pub const fn normal(time: f64, lane: Lane, hand: Hand) -> Self {
        Self {
            time,
            lane,
            layer: 0,
            cut_direction: 0,
            kind: NoteKind::Normal(hand),
        }
    }

    /// Creates a mine.
    #[must_use]
    pub const fn mine(time: f64, lane: Lane) -> Self {
        Self {
            time,
            lane,
            layer: 0,
            cut_direction: 0,
            kind: NoteKind::Mine,
        }
    }

    /// Whether this is a mine.
    #[must_use]
    pub const fn is_mine(&self) -> bool {
        matches!(self.kind, NoteKind::Mine)
    }
}

/// The notes of one source difficulty.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifficultyMap {
    /// Name of the difficulty in the source, e.g. `ExpertPlus`. Informational only.
    pub source_label: Option<String>,
    /// Note events, in any order.
    pub notes: Vec<RawNoteEvent>,
}

impl DifficultyMap {
    /// Creates a map from notes.
    #[must_use]
    pub const fn new(notes: Vec<RawNoteEvent>) -> Self {
        Self {
            source_label: None,
            notes,
        }
    }

    /// Time of the latest note, in beats. `None` if there are no notes.
    #[must_use]
    pub fn last_time(&self) -> Option<f64> {
        self.notes.iter().map(|note| note.time).reduce(f64::max)
    }
}

/// Song-level metadata, shared by all charts of the song.
///
/// Only a constant tempo is supported.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SongMetadata {
    /// Title of the song.
    pub title: String,
    /// Subtitle of the song.
    pub subtitle: Option<String>,
    /// Artist of the song.
    pub artist: Option<String>,
    /// Author of the source map.
    pub credit: Option<String>,
    /// Genre of the song.
    pub genre: Option<String>,
    /// Tempo in beats per minute. Must be positive.
    pub bpm: f64,
    /// Offset written to the output, in seconds.
    pub base_offset_seconds: f64,
    /// Start of the music preview, in seconds.
    pub preview_start_seconds: Option<f64>,
    /// Length of the music preview, in seconds.
    pub preview_length_seconds: Option<f64>,
    /// Music file name.
    pub music: Option<String>,
    /// Banner image file name.
    pub banner: Option<String>,
    /// Background image file name.
    pub background: Option<String>,
}

impl SongMetadata {
    /// Creates metadata with only the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, bpm: f64) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            artist: None,
            credit: None,
            genre: None,
            bpm,
            base_offset_seconds: 0.0,
            preview_start_seconds: None,
            preview_length_seconds: None,
            music: None,
            banner: None,
            background: None,
        }
    }

    /// Checks the invariants the conversion relies on.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInput`] when the title is blank or the BPM is not a positive finite number.
    pub fn validate(&self) -> Result<(), MalformedInput> {
        if self.title.trim().is_empty() {
            return Err(MalformedInput::MissingTitle);
        }
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Err(MalformedInput::NonPositiveBpm(self.bpm));
        }
        Ok(())
    }
}

/// Input that cannot be converted.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MalformedInput {
    /// The song has no title.
    #[error("the song title is missing")]
    MissingTitle,
    /// The BPM is zero, negative or not finite.
    #[error("bpm must be positive, got {0}")]
    NonPositiveBpm(f64),
    /// No difficulty was given.
    #[error("no difficulty to convert")]
    NoDifficulties,
    /// A difficulty has no notes.
    #[error("difficulty #{index} has no notes")]
    EmptyNoteList {
        /// Position of the difficulty in the input.
        index: usize,
    },
}
