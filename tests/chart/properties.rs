use num::Zero;
use rand::{Rng, SeedableRng, rngs::StdRng};
use saber_step::{
    beat::{Beat, beat_to_f64, whole_beats},
    chart::{
        Chart, ChartStats,
        assemble::build_chart,
        difficulty::meter,
        quantize::{Quantizer, measure_resolution},
        rng::RngMock,
    },
    config::{NoteGap, RandomnessLevel, StepConfig},
    song::{DifficultyMap, Hand, Lane, RawNoteEvent, SongMetadata},
};

/// A reproducible stream of notes with uneven spacing, chords and both hands.
fn noisy_map(seed: u64, count: usize) -> DifficultyMap {
    let mut rng = StdRng::seed_from_u64(seed);
    let steps = [0.125, 0.25, 0.25, 0.5, 0.5, 1.0, 0.0];
    let mut time = 0.0;
    let mut notes = Vec::with_capacity(count);
    for _ in 0..count {
        time += steps[rng.random_range(0..steps.len())];
        let lane = Lane::ALL[rng.random_range(0..4)];
        let hand = if rng.random_bool(0.5) {
            Hand::Left
        } else {
            Hand::Right
        };
        notes.push(if rng.random_ratio(1, 16) {
            RawNoteEvent::mine(time, lane)
        } else {
            RawNoteEvent::normal(time, lane, hand)
        });
    }
    DifficultyMap::new(notes)
}

fn charts(config: &StepConfig) -> Vec<Chart> {
    let song = SongMetadata::new("Song", 150.0);
    (1..=8)
        .map(|seed| {
            build_chart(&song, &noisy_map(seed, 300), config, "Hard", RngMock([2, 0, 1, 1, 2]))
                .expect("placement must settle")
                .chart
        })
        .collect()
}

fn configs() -> Vec<StepConfig> {
    let base = StepConfig::default();
    vec![
        base.clone(),
        StepConfig {
            randomness: RandomnessLevel::High,
            ..base.clone()
        },
        StepConfig {
            min_gap_double_tap: NoteGap::Eighth,
            randomness: RandomnessLevel::Medium,
            ..base
        },
    ]
}

/// Rows holding a tap with their beats.
fn tap_rows(chart: &Chart) -> Vec<(f64, Vec<Lane>)> {
    chart
        .ticks_with_beats()
        .filter(|(_, tick)| tick.has_tap())
        .map(|(beat, tick)| (beat, tick.taps().collect()))
        .collect()
}

#[test]
fn grid_times_quantize_to_themselves() {
    for gap in NoteGap::ALL {
        let quantizer = Quantizer::new(gap);
        for whole in [0, 1, 7] {
            for &fraction in quantizer.snap_table() {
                let beat = whole_beats(whole) + fraction;
                assert_eq!(quantizer.quantize(beat_to_f64(beat)), Some(beat), "{gap:?}");
            }
        }
    }
}

#[test]
fn measure_rows_are_multiples_of_four() {
    for config in configs() {
        for chart in charts(&config) {
            for measure in &chart.measures {
                let rows = measure.ticks.len();
                assert!(rows > 0 && rows % 4 == 0, "{rows} rows");
            }
        }
    }
    let beats = [Beat::new(1, 3), Beat::new(5, 8), Beat::zero()];
    assert_eq!(measure_resolution(beats) % 4, 0);
}

#[test]
fn no_fast_double_taps() {
    for config in configs() {
        let threshold = beat_to_f64(config.min_gap_double_tap.beats());
        for chart in charts(&config) {
            for pair in tap_rows(&chart).windows(2) {
                let [(prev_beat, prev), (beat, lanes)] = pair else {
                    unreachable!()
                };
                if prev.len() == 1 && prev == lanes {
                    assert!(
                        beat - prev_beat > threshold + 1e-9,
                        "double tap on {lanes:?} at beat {beat}"
                    );
                }
            }
        }
    }
}

#[test]
fn no_crossovers_when_disallowed() {
    for config in configs() {
        assert!(!config.crossover_allowed);
        for chart in charts(&config) {
            for pair in tap_rows(&chart).windows(2) {
                let [(_, prev), (beat, lanes)] = pair else {
                    unreachable!()
                };
                let outer = |lanes: &[Lane]| match lanes {
                    &[lane] if lane == Lane::LEFT || lane == Lane::RIGHT => Some(lane),
                    _ => None,
                };
                if let (Some(prev), Some(lane)) = (outer(prev.as_slice()), outer(lanes.as_slice())) {
                    assert_ne!(prev, lane, "same foot twice at beat {beat}");
                }
            }
        }
    }
}

#[test]
fn meter_grows_with_density() {
    let mut last = 0;
    for tap in (0..2000).step_by(25) {
        let stats = ChartStats {
            tap,
            ..ChartStats::default()
        };
        let rating = meter(&stats, 400.0, 150.0);
        assert!(rating >= last, "{rating} after {last} at {tap} taps");
        last = rating;
    }
    assert!(last > 1);
}
