//! Options of step generation.
//!
//! [`StepConfig`] is what a user edits before generating charts. Minimum gaps are expressed as
//! note lengths of a 4/4 measure, so [`NoteGap::Eighth`] means "no closer than half a beat".

use thiserror::Error;

use crate::beat::{Beat, note_length};

/// A note length usable as a minimum gap or a snapping granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub enum NoteGap {
    /// 4th notes, one beat.
    Fourth,
    /// 8th notes.
    Eighth,
    /// 12th notes, triplets of 8th notes.
    Twelfth,
    /// 16th notes.
    Sixteenth,
    /// 24th notes.
    TwentyFourth,
    /// 32nd notes.
    ThirtySecond,
}

impl NoteGap {
    /// All gaps from the longest to the shortest.
    pub const ALL: [Self; 6] = [
        Self::Fourth,
        Self::Eighth,
        Self::Twelfth,
        Self::Sixteenth,
        Self::TwentyFourth,
        Self::ThirtySecond,
    ];

    /// Number of such notes in a measure.
    #[must_use]
    pub const fn denominator(self) -> u32 {
        match self {
            Self::Fourth => 4,
            Self::Eighth => 8,
            Self::Twelfth => 12,
            Self::Sixteenth => 16,
            Self::TwentyFourth => 24,
            Self::ThirtySecond => 32,
        }
    }

    /// Length of the gap in beats.
    #[must_use]
    pub fn beats(self) -> Beat {
        note_length(self.denominator())
    }
}

impl TryFrom<u32> for NoteGap {
    type Error = ConfigError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|gap| gap.denominator() == value)
            .ok_or(ConfigError::InvalidNoteGap(value))
    }
}

impl From<NoteGap> for u32 {
    fn from(value: NoteGap) -> Self {
        value.denominator()
    }
}

/// How simultaneous notes of both hands become a jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum JumpMode {
    /// Only a hand hitting 2 or more notes at once (a swing through several notes) makes a jump.
    #[default]
    Swing,
    /// The two hands hitting at once make a jump.
    TwoHands,
    /// Every note of both hands is a step.
    Both,
}

/// How aggressively placement is varied to avoid repetitive patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RandomnessLevel {
    /// Placement follows the rules only.
    #[default]
    None,
    /// Slightly varied.
    Low,
    /// Balanced.
    Medium,
    /// Aggressively varied.
    High,
}

impl RandomnessLevel {
    /// Minimum randomness score of the recent steps accepted without searching for a variation.
    #[must_use]
    pub const fn threshold(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Low => 0.3,
            Self::Medium => 0.5,
            Self::High => 0.7,
        }
    }
}

/// What happens to the foot tracking when a tap right after a jump is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DroppedTapFoot {
    /// The last foot stays as it was.
    #[default]
    Preserve,
    /// The last foot is forgotten, as after a jump.
    Clear,
}

/// Options of step generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct StepConfig {
    /// Whether steps may cross the feet over.
    pub crossover_allowed: bool,
    /// Whether 3 or more simultaneous steps are allowed.
    pub hands_allowed: bool,
    /// How simultaneous notes become jumps.
    pub jump_mode: JumpMode,
    /// Minimum gap between two taps on the same lane.
    pub min_gap_double_tap: NoteGap,
    /// Minimum gap under which crossovers are avoided even if allowed.
    pub min_gap_crossover: NoteGap,
    /// Minimum gap between two jumps.
    pub min_gap_jump: NoteGap,
    /// Minimum gap between a tap and a following jump.
    pub min_gap_tap_jump: NoteGap,
    /// Minimum gap between a jump and a following tap.
    pub min_gap_jump_tap: NoteGap,
    /// Granularity which off-grid source notes are snapped to.
    pub auto_snap: NoteGap,
    /// Strength of the placement variation.
    pub randomness: RandomnessLevel,
    /// Number of recent steps scored for randomness.
    pub lookback_size: usize,
    /// Extra offset applied to every note, in seconds.
    pub additional_offset_seconds: f64,
    /// Foot tracking after a dropped jump-tap.
    pub dropped_tap_foot: DroppedTapFoot,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            crossover_allowed: false,
            hands_allowed: false,
            jump_mode: JumpMode::Swing,
            min_gap_double_tap: NoteGap::Fourth,
            min_gap_crossover: NoteGap::Fourth,
            min_gap_jump: NoteGap::Eighth,
            min_gap_tap_jump: NoteGap::Eighth,
            min_gap_jump_tap: NoteGap::Eighth,
            auto_snap: NoteGap::TwentyFourth,
            randomness: RandomnessLevel::None,
            lookback_size: 10,
            additional_offset_seconds: 0.0,
            dropped_tap_foot: DroppedTapFoot::Preserve,
        }
    }
}

impl StepConfig {
    /// Checks the values that the types alone cannot guarantee.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero lookback size or a non-finite offset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_size == 0 {
            return Err(ConfigError::ZeroLookback);
        }
        if !self.additional_offset_seconds.is_finite() {
            return Err(ConfigError::NonFiniteOffset(self.additional_offset_seconds));
        }
        Ok(())
    }
}

/// An invalid option value.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// A gap is not one of 4, 8, 12, 16, 24 or 32.
    #[error("note gap must be one of 4, 8, 12, 16, 24, 32: {0}")]
    InvalidNoteGap(u32),
    /// The lookback buffer would be empty.
    #[error("lookback size must be positive")]
    ZeroLookback,
    /// The additional offset is NaN or infinite.
    #[error("additional offset must be finite: {0}")]
    NonFiniteOffset(f64),
}
