//! `Info.dat`, the song description of a Beat Saber map.

use serde::Deserialize;

use super::{IngestError, from_json, major_version};
use crate::song::SongMetadata;

/// Characteristic of the regular two-saber difficulties.
pub const STANDARD_CHARACTERISTIC: &str = "Standard";

#[derive(Debug, Deserialize)]
struct VersionProbe {
    #[serde(rename = "_version")]
    version_v2: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InfoV2 {
    #[serde(rename = "_songName")]
    song_name: String,
    #[serde(rename = "_songSubName", default)]
    song_sub_name: String,
    #[serde(rename = "_songAuthorName", default)]
    song_author_name: String,
    #[serde(rename = "_levelAuthorName", default)]
    level_author_name: String,
    #[serde(rename = "_beatsPerMinute")]
    beats_per_minute: f64,
    #[serde(rename = "_previewStartTime", default)]
    preview_start_time: Option<f64>,
    #[serde(rename = "_previewDuration", default)]
    preview_duration: Option<f64>,
    #[serde(rename = "_songFilename", default)]
    song_filename: String,
    #[serde(rename = "_coverImageFilename", default)]
    cover_image_filename: String,
    #[serde(rename = "_songTimeOffset", default)]
    song_time_offset: f64,
    #[serde(rename = "_difficultyBeatmapSets", default)]
    difficulty_beatmap_sets: Vec<BeatmapSetV2>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct BeatmapSetV2 {
    #[serde(rename = "_beatmapCharacteristicName")]
    characteristic: String,
    #[serde(rename = "_difficultyBeatmaps", default)]
    beatmaps: Vec<BeatmapV2>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct BeatmapV2 {
    #[serde(rename = "_difficulty")]
    difficulty: String,
    #[serde(rename = "_difficultyRank", default)]
    rank: i32,
    #[serde(rename = "_beatmapFilename")]
    filename: String,
}

/// One difficulty listed in `Info.dat`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BeatmapEntry {
    /// Characteristic such as `Standard` or `OneSaber`.
    pub characteristic: String,
    /// Difficulty such as `ExpertPlus`.
    pub difficulty: String,
    /// Rank of the difficulty, higher is harder.
    pub rank: i32,
    /// File name of the difficulty, relative to the map folder.
    pub filename: String,
}

/// Song description of a Beat Saber map.
#[derive(Debug, Clone, PartialEq)]
pub struct SaberInfo {
    /// Format version as written.
    pub version: String,
    /// Song name.
    pub song_name: String,
    /// Song subtitle.
    pub song_sub_name: String,
    /// Artist of the song.
    pub song_author_name: String,
    /// Author of the map.
    pub level_author_name: String,
    /// Tempo in beats per minute.
    pub bpm: f64,
    /// Start of the preview, in seconds.
    pub preview_start_time: Option<f64>,
    /// Length of the preview, in seconds.
    pub preview_duration: Option<f64>,
    /// Music file name, usually with the `.egg` extension.
    pub song_filename: String,
    /// Cover image file name.
    pub cover_image_filename: String,
    /// Offset of the music, in seconds.
    pub song_time_offset: f64,
    /// Difficulties of all characteristics.
    pub beatmaps: Vec<BeatmapEntry>,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

impl SaberInfo {
    /// Builds the song metadata of the output.
    ///
    /// The cover image is used both as banner and background.
    #[must_use]
    pub fn song_metadata(&self) -> SongMetadata {
        SongMetadata {
            title: self.song_name.clone(),
            subtitle: non_empty(&self.song_sub_name),
            artist: non_empty(&self.song_author_name),
            credit: non_empty(&self.level_author_name),
            genre: None,
            bpm: self.bpm,
            base_offset_seconds: self.song_time_offset,
            preview_start_seconds: self.preview_start_time,
            preview_length_seconds: self.preview_duration,
            music: non_empty(&self.song_filename),
            banner: non_empty(&self.cover_image_filename),
            background: non_empty(&self.cover_image_filename),
        }
    }

    /// Difficulties of the regular two-saber mode.
    pub fn standard_beatmaps(&self) -> impl Iterator<Item = &BeatmapEntry> {
        self.beatmaps
            .iter()
            .filter(|entry| entry.characteristic == STANDARD_CHARACTERISTIC)
    }
}

impl From<(String, InfoV2)> for SaberInfo {
    fn from((version, info): (String, InfoV2)) -> Self {
        let beatmaps = info
            .difficulty_beatmap_sets
            .into_iter()
            .flat_map(|set| {
                let characteristic = set.characteristic;
                set.beatmaps.into_iter().map(move |beatmap| BeatmapEntry {
                    characteristic: characteristic.clone(),
                    difficulty: beatmap.difficulty,
                    rank: beatmap.rank,
                    filename: beatmap.filename,
                })
            })
            .collect();
        Self {
            version,
            song_name: info.song_name,
            song_sub_name: info.song_sub_name,
            song_author_name: info.song_author_name,
            level_author_name: info.level_author_name,
            bpm: info.beats_per_minute,
            preview_start_time: info.preview_start_time,
            preview_duration: info.preview_duration,
            song_filename: info.song_filename,
            cover_image_filename: info.cover_image_filename,
            song_time_offset: info.song_time_offset,
            beatmaps,
        }
    }
}

/// Parses an `Info.dat` of format version 2.
///
/// # Errors
///
/// Returns [`IngestError`] for invalid JSON, a missing field, or another format version.
pub fn parse_info(source: &str) -> Result<SaberInfo, IngestError> {
    let probe: VersionProbe = from_json(source)?;
    let version = match (probe.version_v2, probe.version) {
        (Some(version), _) if major_version(&version) == Some(2) => version,
        (Some(version), _) | (None, Some(version)) => {
            return Err(IngestError::UnsupportedMapVersion(version));
        }
        (None, None) => return Err(IngestError::MissingVersion),
    };
    let info: InfoV2 = from_json(source)?;
    Ok(SaberInfo::from((version, info)))
}
