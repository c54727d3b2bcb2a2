//! Difficulty files, holding the notes of one difficulty.
//!
//! Format version 2 keys everything with a leading underscore and marks the saber with `_type`.
//! Format version 3 splits notes into `colorNotes` and `bombNotes`, with `c` for the saber and
//! `d` for the cut direction.

use serde::{Deserialize, de::IgnoredAny};
use thiserror::Error;

use super::{IngestError, from_json, major_version};
use crate::song::{DifficultyMap, Hand, Lane, RawNoteEvent};

/// Format version of a difficulty file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapVersion {
    /// Keys with a leading underscore, notes in `_notes`.
    V2,
    /// Notes in `colorNotes` and `bombNotes`.
    V3,
}

/// Something in a difficulty file that is skipped.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum IngestWarning {
    /// A version 2 note has a type other than left, right or bomb.
    #[error("note {index} has unknown type {note_type}")]
    UnknownNoteType {
        /// Position of the note in the file.
        index: usize,
        /// The type found.
        note_type: i64,
    },
    /// A version 3 note has a color other than left or right.
    #[error("note {index} has unknown color {color}")]
    UnknownColor {
        /// Position of the note in `colorNotes`.
        index: usize,
        /// The color found.
        color: i64,
    },
    /// A note is outside of the four lanes.
    #[error("note {index} is on line {line_index}, out of range")]
    LaneOutOfRange {
        /// Position of the note in its list.
        index: usize,
        /// The line index found.
        line_index: i64,
    },
    /// A note has a time that is not a finite number.
    #[error("note {index} has non-finite time")]
    NonFiniteTime {
        /// Position of the note in its list.
        index: usize,
    },
    /// Obstacles were found and ignored.
    #[error("{0} obstacles ignored")]
    IgnoredObstacles(usize),
    /// Arcs or chains were found and ignored.
    #[error("{0} sliders ignored")]
    IgnoredSliders(usize),
}

/// Output of [`parse_map`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct MapOutput {
    /// Notes of the difficulty.
    pub map: DifficultyMap,
    /// Format version of the file.
    pub version: MapVersion,
    /// Warnings about skipped content.
    pub warnings: Vec<IngestWarning>,
}

#[derive(Debug, Deserialize)]
struct VersionProbe {
    #[serde(rename = "_version")]
    version_v2: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MapV2 {
    #[serde(rename = "_notes", default)]
    notes: Vec<NoteV2>,
    #[serde(rename = "_obstacles", default)]
    obstacles: Vec<IgnoredAny>,
    #[serde(rename = "_sliders", default)]
    sliders: Vec<IgnoredAny>,
}

#[derive(Debug, Deserialize)]
struct NoteV2 {
    #[serde(rename = "_time")]
    time: f64,
    #[serde(rename = "_lineIndex")]
    line_index: i64,
    #[serde(rename = "_lineLayer", default)]
    line_layer: i32,
    #[serde(rename = "_type")]
    note_type: i64,
    #[serde(rename = "_cutDirection", default)]
    cut_direction: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapV3 {
    #[serde(default)]
    color_notes: Vec<ColorNoteV3>,
    #[serde(default)]
    bomb_notes: Vec<BombNoteV3>,
    #[serde(default)]
    obstacles: Vec<IgnoredAny>,
    #[serde(default)]
    sliders: Vec<IgnoredAny>,
    #[serde(default)]
    burst_sliders: Vec<IgnoredAny>,
}

#[derive(Debug, Deserialize)]
struct ColorNoteV3 {
    b: f64,
    x: i64,
    #[serde(default)]
    y: i32,
    c: i64,
    #[serde(default)]
    d: i32,
}

#[derive(Debug, Deserialize)]
struct BombNoteV3 {
    b: f64,
    x: i64,
    #[serde(default)]
    y: i32,
}

/// Collects notes, skipping the invalid ones with a warning.
#[derive(Debug, Default)]
struct NoteSink {
    notes: Vec<RawNoteEvent>,
    warnings: Vec<IngestWarning>,
}

impl NoteSink {
    fn lane(&mut self, index: usize, time: f64, line_index: i64) -> Option<Lane> {
        if !time.is_finite() {
            self.warnings.push(IngestWarning::NonFiniteTime { index });
            return None;
        }
        match Lane::try_from(line_index) {
            Ok(lane) => Some(lane),
            Err(_) => {
                self.warnings
                    .push(IngestWarning::LaneOutOfRange { index, line_index });
                None
            }
        }
    }

    fn push(&mut self, mut note: RawNoteEvent, layer: i32, cut_direction: i32) {
        note.layer = layer;
        note.cut_direction = cut_direction;
        self.notes.push(note);
    }

    fn ignored(&mut self, obstacles: usize, sliders: usize) {
        if obstacles > 0 {
            self.warnings.push(IngestWarning::IgnoredObstacles(obstacles));
        }
        if sliders > 0 {
            self.warnings.push(IngestWarning::IgnoredSliders(sliders));
        }
    }

    fn finish(self, version: MapVersion) -> MapOutput {
        MapOutput {
            map: DifficultyMap::new(self.notes),
            version,
            warnings: self.warnings,
        }
    }
}

fn ingest_v2(map: MapV2) -> MapOutput {
    let mut sink = NoteSink::default();
    for (index, note) in map.notes.into_iter().enumerate() {
        let event = |lane| match note.note_type {
            0 => Some(RawNoteEvent::normal(note.time, lane, Hand::Left)),
            1 => Some(RawNoteEvent::normal(note.time, lane, Hand::Right)),
            3 => Some(RawNoteEvent::mine(note.time, lane)),
            _ => None,
        };
        let Some(lane) = sink.lane(index, note.time, note.line_index) else {
            continue;
        };
        match event(lane) {
            Some(event) => sink.push(event, note.line_layer, note.cut_direction),
            None => {
                log::trace!("skipping note {index} of type {}", note.note_type);
                sink.warnings.push(IngestWarning::UnknownNoteType {
                    index,
                    note_type: note.note_type,
                });
            }
        }
    }
    sink.ignored(map.obstacles.len(), map.sliders.len());
    sink.finish(MapVersion::V2)
}

fn ingest_v3(map: MapV3) -> MapOutput {
    let mut sink = NoteSink::default();
    for (index, note) in map.color_notes.into_iter().enumerate() {
        let Some(lane) = sink.lane(index, note.b, note.x) else {
            continue;
        };
        let hand = match note.c {
            0 => Hand::Left,
            1 => Hand::Right,
            color => {
                sink.warnings
                    .push(IngestWarning::UnknownColor { index, color });
                continue;
            }
        };
        sink.push(RawNoteEvent::normal(note.b, lane, hand), note.y, note.d);
    }
    for (index, bomb) in map.bomb_notes.into_iter().enumerate() {
        if let Some(lane) = sink.lane(index, bomb.b, bomb.x) {
            sink.push(RawNoteEvent::mine(bomb.b, lane), bomb.y, 0);
        }
    }
    sink.ignored(
        map.obstacles.len(),
        map.sliders.len() + map.burst_sliders.len(),
    );
    sink.finish(MapVersion::V3)
}

/// Parses a difficulty file of format version 2 or 3.
///
/// # Errors
///
/// Returns [`IngestError`] for invalid JSON, a missing field, or another format version.
pub fn parse_map(source: &str) -> Result<MapOutput, IngestError> {
    let probe: VersionProbe = from_json(source)?;
    let output = match (probe.version, probe.version_v2) {
        (Some(version), _) => match major_version(&version) {
            Some(3) => ingest_v3(from_json(source)?),
            _ => return Err(IngestError::UnsupportedMapVersion(version)),
        },
        (None, Some(version)) => match major_version(&version) {
            Some(2) => ingest_v2(from_json(source)?),
            _ => return Err(IngestError::UnsupportedMapVersion(version)),
        },
        (None, None) => return Err(IngestError::MissingVersion),
    };
    log::debug!(
        "read {:?} map with {} notes and {} warnings",
        output.version,
        output.map.notes.len(),
        output.warnings.len()
    );
    Ok(output)
}
