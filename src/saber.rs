//! Reading Beat Saber map files.
//!
//! A Beat Saber map folder holds an `Info.dat` describing the song and its difficulties, and
//! one `.dat` file per difficulty with the notes. Both are JSON.
//!
//! - [`info`] reads `Info.dat` of format version 2 into [`SaberInfo`],
//! - [`map`] reads difficulty files of format version 2 and 3 into [`DifficultyMap`]s.
//!
//! Format version 4 and later are not supported.
//!
//! [`DifficultyMap`]: crate::song::DifficultyMap

pub mod info;
pub mod map;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use self::{
    info::{BeatmapEntry, SaberInfo, parse_info},
    map::{IngestWarning, MapOutput, MapVersion, parse_map},
};

/// A map file that could not be read.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// The text is not valid JSON or does not have the expected shape.
    #[error("invalid map json at {path} (line {line}, column {column}): {message}")]
    Json {
        /// Path to the offending value, like `_notes[3]._time`.
        path: String,
        /// Description from the JSON parser.
        message: String,
        /// Line of the error, from 1. 0 if unknown.
        line: usize,
        /// Column of the error, from 1. 0 if unknown.
        column: usize,
    },
    /// The format version is known but not supported.
    #[error("unsupported map version: {0}")]
    UnsupportedMapVersion(String),
    /// The file declares no format version.
    #[error("map version is missing")]
    MissingVersion,
}

impl From<serde_path_to_error::Error<serde_json::Error>> for IngestError {
    fn from(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = error.path().to_string();
        let inner = error.into_inner();
        Self::Json {
            path,
            line: inner.line(),
            column: inner.column(),
            message: inner.to_string(),
        }
    }
}

/// Deserializes `source`, keeping the path to the value on failure.
pub(crate) fn from_json<T: DeserializeOwned>(source: &str) -> Result<T, IngestError> {
    let deserializer = &mut serde_json::Deserializer::from_str(source);
    let value = serde_path_to_error::deserialize(deserializer)?;
    Ok(value)
}

/// Major version of a version string like `2.5.0`.
pub(crate) fn major_version(version: &str) -> Option<u32> {
    version.trim().split('.').next()?.parse().ok()
}
