//! Conversion of a whole song, from source difficulties to the `.sm` text.

use thiserror::Error;

use crate::{
    chart::{
        Chart,
        assemble::{BuildWarning, ChartBuildOutput, build_chart, difficulty_labels, order_maps},
        placement::UnsettledPlacement,
        rng::Rng,
    },
    config::{ConfigError, StepConfig},
    song::{DifficultyMap, MalformedInput, SongMetadata},
    sm::write_sm,
};

/// An error stopping the conversion. No chart is produced when it occurs.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// The song or its difficulties cannot be converted.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),
    /// The options are invalid.
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// An internal rule was broken. This is a bug.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl From<UnsettledPlacement> for ConvertError {
    fn from(error: UnsettledPlacement) -> Self {
        Self::InvariantViolation(error.to_string())
    }
}

/// A chart warning, with the label of the chart it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartWarning {
    /// Label of the chart, like `Challenge`.
    pub chart: String,
    /// What happened.
    pub warning: BuildWarning,
}

/// Output of [`convert`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Conversion {
    /// Charts from the one with the most notes.
    pub charts: Vec<Chart>,
    /// The `.sm` text of the song and its charts.
    pub text: String,
    /// Notes discarded while building the charts.
    pub warnings: Vec<ChartWarning>,
}

fn check_input(
    song: &SongMetadata,
    maps: &[DifficultyMap],
    config: &StepConfig,
) -> Result<(), ConvertError> {
    song.validate()?;
    config.validate()?;
    if maps.is_empty() {
        return Err(MalformedInput::NoDifficulties.into());
    }
    if let Some(index) = maps.iter().position(|map| map.notes.is_empty()) {
        return Err(MalformedInput::EmptyNoteList { index }.into());
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn build_all<R>(
    song: &SongMetadata,
    maps: &[&DifficultyMap],
    labels: Vec<String>,
    config: &StepConfig,
    rng: &R,
) -> Result<Vec<ChartBuildOutput>, UnsettledPlacement>
where
    R: Rng + Clone + Send + Sync,
{
    use rayon::prelude::*;

    maps.par_iter()
        .zip(labels)
        .map(|(map, label)| build_chart(song, map, config, label, rng.clone()))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn build_all<R>(
    song: &SongMetadata,
    maps: &[&DifficultyMap],
    labels: Vec<String>,
    config: &StepConfig,
    rng: &R,
) -> Result<Vec<ChartBuildOutput>, UnsettledPlacement>
where
    R: Rng + Clone + Send + Sync,
{
    maps.iter()
        .zip(labels)
        .map(|(map, label)| build_chart(song, map, config, label, rng.clone()))
        .collect()
}

/// Converts the difficulties of a song into `.sm` charts.
///
/// At most 10 difficulties are converted, those with the most notes. Each chart is built with
/// its own clone of `rng`, so the charts do not depend on each other.
///
/// # Errors
///
/// Returns [`ConvertError`] for an invalid song or config, no difficulty, or a difficulty
/// without notes.
pub fn convert<R>(
    song: &SongMetadata,
    maps: &[DifficultyMap],
    config: &StepConfig,
    rng: R,
) -> Result<Conversion, ConvertError>
where
    R: Rng + Clone + Send + Sync,
{
    check_input(song, maps, config)?;

    let ordered = order_maps(maps);
    let labels = difficulty_labels(ordered.len());
    let outputs = build_all(song, &ordered, labels, config, &rng)?;

    let mut charts = Vec::with_capacity(outputs.len());
    let mut warnings = Vec::new();
    for ChartBuildOutput {
        chart,
        warnings: chart_warnings,
    } in outputs
    {
        warnings.extend(chart_warnings.into_iter().map(|warning| ChartWarning {
            chart: chart.name.clone(),
            warning,
        }));
        charts.push(chart);
    }
    let text = write_sm(song, &charts);
    log::debug!(
        "converted {} charts of {:?} with {} warnings",
        charts.len(),
        song.title,
        warnings.len()
    );
    Ok(Conversion {
        charts,
        text,
        warnings,
    })
}

/// Converts with the standard random number generator seeded by `seed`.
///
/// The same seed gives the same charts.
///
/// # Errors
///
/// Same as [`convert`].
#[cfg(feature = "rand")]
pub fn convert_seeded(
    song: &SongMetadata,
    maps: &[DifficultyMap],
    config: &StepConfig,
    seed: u64,
) -> Result<Conversion, ConvertError> {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::chart::rng::RandRng;

    convert(song, maps, config, RandRng(StdRng::seed_from_u64(seed)))
}
