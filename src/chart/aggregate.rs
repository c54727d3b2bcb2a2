//! Turning the notes of one timestamp into candidate lanes.
//!
//! Beat Saber notes are cut by two hands, possibly several at once, while a dance chart is stepped
//! by two feet. This module decides which lanes the notes sharing a timestamp ask for, before the
//! placement rules get their say, and lays mines over the placed row afterwards.

use std::collections::BTreeMap;

use itertools::Itertools;

use super::{Slot, Tick};
use crate::{
    config::JumpMode,
    song::{Hand, LANE_COUNT, Lane, NoteKind, RawNoteEvent},
};

/// Lanes requested by the notes of one timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Aggregate {
    /// Lanes for taps, in order of preference. Two or more lanes make a jump.
    pub candidate: Vec<Lane>,
    /// Lanes of the mines.
    pub mines: Vec<Lane>,
}

/// Aggregates `events`, which all share one timestamp.
///
/// Notes are grouped by hand. When a hand hits the same lane twice, the later note moves to the
/// next free lane on the right. When both hands hit at once, `mode` picks the lanes:
///
/// - [`JumpMode::Swing`]: the lanes of every hand hitting 2 or more notes, or else the first
///   lane of the left hand,
/// - [`JumpMode::TwoHands`]: the first lane of each hand,
/// - [`JumpMode::Both`]: every lane of both hands.
///
/// The last two always make a jump: a single distinct lane is paired with the lane on its right.
#[must_use]
pub fn aggregate(events: &[RawNoteEvent], mode: JumpMode) -> Aggregate {
    let mut hands: BTreeMap<Hand, Vec<Lane>> = BTreeMap::new();
    let mut mines = Vec::new();
    for event in events {
        match event.kind {
            NoteKind::Mine => mines.push(event.lane),
            NoteKind::Normal(hand) => push_bumped(hands.entry(hand).or_default(), event.lane),
        }
    }

    let candidate = match hands.len() {
        0 => Vec::new(),
        1 => hands.into_values().next().unwrap_or_default(),
        _ => match mode {
            JumpMode::Swing => {
                let swings: Vec<Lane> = hands
                    .values()
                    .filter(|lanes| lanes.len() >= 2)
                    .flatten()
                    .copied()
                    .unique()
                    .collect();
                if swings.is_empty() {
                    hands.values().flatten().copied().take(1).collect()
                } else {
                    swings
                }
            }
            JumpMode::TwoHands => pad_to_jump(
                hands
                    .values()
                    .filter_map(|lanes| lanes.first())
                    .copied()
                    .unique()
                    .collect(),
            ),
            JumpMode::Both => pad_to_jump(hands.values().flatten().copied().unique().collect()),
        },
    };

    Aggregate { candidate, mines }
}

/// Adds `lane` to the lanes of a hand, moving right past lanes the hand already hits.
fn push_bumped(lanes: &mut Vec<Lane>, lane: Lane) {
    let free = std::iter::successors(Some(lane), |lane| Some(lane.rotated()))
        .take(LANE_COUNT)
        .find(|lane| !lanes.contains(lane));
    if let Some(free) = free {
        lanes.push(free);
    }
}

fn pad_to_jump(mut lanes: Vec<Lane>) -> Vec<Lane> {
    if let &[single] = lanes.as_slice() {
        lanes.push(single.rotated());
    }
    lanes
}

/// Lays `mines` over a placed row.
///
/// A mine goes to its own lane unless a tap is there. Then it moves to the leftmost empty lane,
/// and if the row is full it takes the leftmost lane, replacing what is there. Several mines on
/// one lane merge.
pub fn layer_mines(tick: &mut Tick, mines: &[Lane]) {
    for &lane in mines {
        let target = match tick.get(lane) {
            Slot::Empty | Slot::Mine => lane,
            Slot::Tap => Lane::ALL
                .into_iter()
                .find(|&other| tick.get(other) == Slot::Empty)
                .or_else(|| {
                    Lane::ALL
                        .into_iter()
                        .find(|&other| tick.get(other) != Slot::Empty)
                })
                .unwrap_or(lane),
        };
        tick.set(target, Slot::Mine);
    }
}
