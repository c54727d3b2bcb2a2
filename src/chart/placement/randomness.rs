//! Variation of single steps against repetitive patterns.
//!
//! Recent steps are scored by how evenly they spread over the lanes, and how long the longest
//! run on one lane is. When the score falls below the configured threshold, a few random
//! alternative lanes are tried through the placement rules and the one improving the score the
//! most wins. The rules always have the last word, so a variation never breaks a gap rule.

use super::{PlacementState, UnsettledPlacement, enforce_rules};
use crate::{
    beat::Beat,
    chart::{
        Tick,
        rng::{Rng, lane_index_excluding},
    },
    config::{RandomnessLevel, StepConfig},
    song::{LANE_COUNT, Lane},
};

/// Number of alternative lanes tried for one step.
pub const TRIALS: usize = 5;

/// Buffers shorter than this are not scored, unless the lookback size itself is smaller.
pub const MIN_SCORED_LEN: usize = 10;

const ENTROPY_WEIGHT: f64 = 0.5;
const DISTRIBUTION_WEIGHT: f64 = 0.3;
const STREAK_WEIGHT: f64 = 0.2;

fn lane_counts(ticks: &[Tick]) -> [u32; LANE_COUNT] {
    let mut counts = [0; LANE_COUNT];
    for lane in ticks.iter().flat_map(|tick| tick.taps()) {
        counts[lane.index()] += 1;
    }
    counts
}

/// Shannon entropy of the lane distribution, `0` to `1`.
fn normalized_entropy(counts: &[u32; LANE_COUNT]) -> f64 {
    let total: u32 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let entropy: f64 = counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = f64::from(count) / f64::from(total);
            -p * p.log2()
        })
        .sum();
    entropy / (LANE_COUNT as f64).log2()
}

/// Largest deviation of a lane count from the mean, relative to the mean.
fn max_deviation(counts: &[u32; LANE_COUNT]) -> f64 {
    let total: u32 = counts.iter().sum();
    if total == 0 {
        return 1.0;
    }
    let mean = f64::from(total) / LANE_COUNT as f64;
    let deviation = counts
        .iter()
        .map(|&count| (f64::from(count) - mean).abs())
        .fold(0.0, f64::max);
    deviation / mean.max(1.0)
}

/// Length of the longest run of rows whose leftmost tap is on the same lane.
fn longest_streak(ticks: &[Tick]) -> usize {
    let mut longest = 0;
    let mut current: Option<(Lane, usize)> = None;
    for tick in ticks {
        current = match (tick.taps().next(), current) {
            (None, _) => None,
            (Some(lane), Some((last, streak))) if lane == last => Some((lane, streak + 1)),
            (Some(lane), _) => Some((lane, 1)),
        };
        if let Some((_, streak)) = current {
            longest = longest.max(streak);
        }
    }
    longest
}

/// Scores how varied `ticks` are, higher is more varied.
///
/// Fewer rows than `lookback_size` or 10, whichever is smaller, always score `1`.
#[must_use]
pub fn randomness_score(ticks: &[Tick], lookback_size: usize) -> f64 {
    if ticks.is_empty() || ticks.len() < lookback_size.min(MIN_SCORED_LEN) {
        return 1.0;
    }
    let counts = lane_counts(ticks);
    let streak = longest_streak(ticks) as f64 / ticks.len() as f64;
    normalized_entropy(&counts) * ENTROPY_WEIGHT
        + (1.0 - max_deviation(&counts)) * DISTRIBUTION_WEIGHT
        + (1.0 - streak) * STREAK_WEIGHT
}

/// Searches for a more varied lane than `placed`, a single step already through the rules.
///
/// Jumps, dropped steps and a [`RandomnessLevel::None`] config are returned unchanged.
pub(super) fn relax(
    config: &StepConfig,
    state: &PlacementState,
    placed: Vec<Lane>,
    gap: Option<Beat>,
    rng: &mut impl Rng,
) -> Result<Vec<Lane>, UnsettledPlacement> {
    if config.randomness == RandomnessLevel::None || placed.len() != 1 {
        return Ok(placed);
    }
    let mut buffer = state.lookback_ticks();
    let mut best_score = randomness_score(&buffer, config.lookback_size);
    if best_score >= config.randomness.threshold() {
        return Ok(placed);
    }

    if buffer.len() >= config.lookback_size {
        buffer.remove(0);
    }
    let mut best = placed;
    for _ in 0..TRIALS {
        let exclude = best.first().map_or(0, |lane| lane.index());
        let trial_lane = Lane::ALL[lane_index_excluding(rng, exclude)];
        let trial = enforce_rules(config, state, &[trial_lane], gap)?;
        if trial.is_empty() {
            continue;
        }
        buffer.push(Tick::from_taps(&trial));
        let score = randomness_score(&buffer, config.lookback_size);
        buffer.pop();
        if score > best_score {
            log::trace!("varied lane {trial:?} scores {score:.3} over {best_score:.3}");
            best_score = score;
            best = trial;
        }
    }
    Ok(best)
}
