//! Foot placement rules.
//!
//! Candidate lanes from [`super::aggregate`] are not always comfortable to step: the same panel
//! twice in a fast stream, a tap right after a jump, or the left foot walking over to the right
//! panel. The rules here move or drop steps to avoid that, based on the time since the previous
//! step and on which foot stepped last.
//!
//! The rules, checked in order and re-checked from the top after every change:
//!
//! 1. A single step repeating the previous step within the double-tap gap moves one lane right.
//! 2. A single step following a jump within the jump-tap gap is dropped.
//! 3. A single step on an outer lane of the foot that stepped last moves one lane right, when
//!    crossovers are disallowed or the gap is within the crossover gap.
//! 4. Any other single step is accepted.
//! 5. A jump keeps at most 2 lanes unless hands are allowed, and becomes a single step when it
//!    follows a jump within the jump gap, or a single step within the tap-jump gap.
//!
//! A rule fires when the gap is shorter than or equal to its threshold.

pub mod randomness;

use std::collections::VecDeque;

use thiserror::Error;

use super::{Tick, aggregate::Aggregate, aggregate::layer_mines, rng::Rng};
use crate::{
    beat::Beat,
    config::{DroppedTapFoot, NoteGap, StepConfig},
    song::Lane,
};

/// Maximum number of rule passes for one timestamp.
pub const MAX_PASSES: usize = 8;

/// The foot that stepped last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Foot {
    /// Steps on lane 0 are left steps.
    Left,
    /// Steps on lane 3 are right steps.
    Right,
}

impl Foot {
    /// The foot implied by stepping on `lane`, if any.
    #[must_use]
    pub fn of_lane(lane: Lane) -> Option<Self> {
        match lane {
            Lane::LEFT => Some(Self::Left),
            Lane::RIGHT => Some(Self::Right),
            _ => None,
        }
    }

    /// The other foot. Without a last foot, the left foot steps next.
    #[must_use]
    pub const fn next_after(last: Option<Self>) -> Self {
        match last {
            Some(Self::Left) => Self::Right,
            Some(Self::Right) | None => Self::Left,
        }
    }
}

/// Placement rules never settled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("placement of lanes {lanes:?} did not settle within {MAX_PASSES} passes")]
pub struct UnsettledPlacement {
    /// The candidate lanes which were being placed.
    pub lanes: Vec<Lane>,
}

/// What the placement remembers while walking through a chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlacementState {
    /// The last placed row holding a tap.
    pub last_tick: Option<Tick>,
    /// Position of [`Self::last_tick`].
    pub last_tick_time: Option<Beat>,
    /// The foot that stepped last, unknown after a jump.
    pub last_foot: Option<Foot>,
    /// Recent rows holding a tap with the gap before each, oldest first.
    pub lookback: VecDeque<(Tick, Option<Beat>)>,
}

impl PlacementState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time since the last row holding a tap, or `None` when there was none.
    #[must_use]
    pub fn beat_gap(&self, time: Beat) -> Option<Beat> {
        self.last_tick_time.map(|last| time - last)
    }

    /// Whether `lanes` are exactly the taps of the last row.
    fn repeats(&self, lanes: &[Lane]) -> bool {
        self.last_tick
            .is_some_and(|tick| tick.taps().eq(lanes.iter().copied()))
    }

    fn last_was_jump(&self) -> bool {
        self.last_tick.is_some_and(|tick| tick.is_jump())
    }

    fn last_was_single(&self) -> bool {
        self.last_tick.is_some_and(|tick| tick.tap_count() == 1)
    }

    /// Rows of the lookback buffer, oldest first.
    #[must_use]
    pub fn lookback_ticks(&self) -> Vec<Tick> {
        self.lookback.iter().map(|&(tick, _)| tick).collect()
    }

    /// Remembers a placed row. Rows without a tap leave the state as it is.
    pub fn record(&mut self, time: Beat, tick: Tick, gap: Option<Beat>, lookback_size: usize) {
        if !tick.has_tap() {
            return;
        }
        self.last_tick = Some(tick);
        self.last_tick_time = Some(time);
        self.lookback.push_back((tick, gap));
        while self.lookback.len() > lookback_size {
            self.lookback.pop_front();
        }
    }
}

/// Whether `gap` is within the threshold of `note`.
fn within(gap: Option<Beat>, note: NoteGap) -> bool {
    gap.is_some_and(|gap| gap <= note.beats())
}

enum Pass {
    Settled(Vec<Lane>),
    Retry(Vec<Lane>),
}

fn apply_rules(
    config: &StepConfig,
    state: &PlacementState,
    lanes: Vec<Lane>,
    gap: Option<Beat>,
) -> Pass {
    match lanes.len() {
        0 => Pass::Settled(lanes),
        1 => {
            let lane = lanes[0];
            if within(gap, config.min_gap_double_tap) && state.repeats(&lanes) {
                log::trace!("double tap on lane {lane}, moving right");
                return Pass::Retry(vec![lane.rotated()]);
            }
            if within(gap, config.min_gap_jump_tap) && state.last_was_jump() {
                log::trace!("tap on lane {lane} right after a jump, dropping");
                return Pass::Settled(Vec::new());
            }
            let guard_crossover =
                !config.crossover_allowed || within(gap, config.min_gap_crossover);
            if guard_crossover
                && state.last_foot.is_some()
                && Foot::of_lane(lane) == state.last_foot
            {
                log::trace!("crossover on lane {lane}, moving right");
                return Pass::Retry(vec![lane.rotated()]);
            }
            Pass::Settled(lanes)
        }
        _ => {
            let mut lanes = lanes;
            if !config.hands_allowed {
                lanes.truncate(2);
            }
            let demote = (state.last_was_jump() && within(gap, config.min_gap_jump))
                || (state.last_was_single() && within(gap, config.min_gap_tap_jump));
            if demote {
                log::trace!("jump on lanes {lanes:?} too close, keeping the first lane");
                lanes.truncate(1);
                Pass::Retry(lanes)
            } else {
                Pass::Settled(lanes)
            }
        }
    }
}

/// Applies the placement rules to `candidate`, `gap` beats after the last row holding a tap.
///
/// The result is empty when the step is dropped. `state` is only read.
///
/// # Errors
///
/// Returns [`UnsettledPlacement`] if the rules keep changing the lanes for [`MAX_PASSES`] passes.
pub fn enforce_rules(
    config: &StepConfig,
    state: &PlacementState,
    candidate: &[Lane],
    gap: Option<Beat>,
) -> Result<Vec<Lane>, UnsettledPlacement> {
    let mut lanes = candidate.to_vec();
    for _ in 0..MAX_PASSES {
        match apply_rules(config, state, lanes, gap) {
            Pass::Settled(settled) => return Ok(settled),
            Pass::Retry(retry) => lanes = retry,
        }
    }
    Err(UnsettledPlacement {
        lanes: candidate.to_vec(),
    })
}

/// The foot that stepped last after placing `placed` for `candidate`.
fn next_foot(
    config: &StepConfig,
    state: &PlacementState,
    candidate: &[Lane],
    placed: &[Lane],
) -> Option<Foot> {
    match placed {
        [] if !candidate.is_empty() && config.dropped_tap_foot == DroppedTapFoot::Clear => None,
        [] => state.last_foot,
        _ if state.repeats(placed) => state.last_foot,
        &[lane] => Some(Foot::of_lane(lane).unwrap_or(Foot::next_after(state.last_foot))),
        _ => None,
    }
}

/// Places the steps of a chart, one timestamp at a time in ascending order.
#[derive(Debug)]
pub struct PlacementEngine<'a, R> {
    config: &'a StepConfig,
    state: PlacementState,
    rng: R,
}

impl<'a, R: Rng> PlacementEngine<'a, R> {
    /// Creates an engine for a new chart.
    pub fn new(config: &'a StepConfig, rng: R) -> Self {
        Self {
            config,
            state: PlacementState::new(),
            rng,
        }
    }

    /// Current state of the placement.
    #[must_use]
    pub const fn state(&self) -> &PlacementState {
        &self.state
    }

    /// Places the aggregated notes at `time` and returns the row with its mines.
    ///
    /// # Errors
    ///
    /// Returns [`UnsettledPlacement`] if the rules do not settle.
    pub fn place(
        &mut self,
        time: Beat,
        aggregate: &Aggregate,
    ) -> Result<Tick, UnsettledPlacement> {
        let gap = self.state.beat_gap(time);
        let ruled = enforce_rules(self.config, &self.state, &aggregate.candidate, gap)?;
        let placed = randomness::relax(self.config, &self.state, ruled, gap, &mut self.rng)?;
        self.state.last_foot = next_foot(self.config, &self.state, &aggregate.candidate, &placed);

        let mut tick = Tick::from_taps(&placed);
        layer_mines(&mut tick, &aggregate.mines);
        self.state.record(time, tick, gap, self.config.lookback_size);
        Ok(tick)
    }
}
