use pretty_assertions::assert_eq;
use saber_step::{
    chart::{Chart, assemble::build_chart, rng::RngMock},
    config::{JumpMode, NoteGap, RandomnessLevel, StepConfig},
    song::{DifficultyMap, Hand, Lane, RawNoteEvent, SongMetadata},
};

fn lane(index: u8) -> Lane {
    Lane::new(index).unwrap()
}

fn first_rows(chart: &Chart, count: usize) -> Vec<String> {
    chart
        .ticks_with_beats()
        .take(count)
        .map(|(_, tick)| tick.to_string())
        .collect()
}

#[test]
fn double_tap_on_the_threshold_is_rotated() {
    let song = SongMetadata::new("Song", 120.0);
    let map = DifficultyMap::new(vec![
        RawNoteEvent::normal(0.0, Lane::LEFT, Hand::Left),
        RawNoteEvent::normal(1.0, Lane::LEFT, Hand::Left),
    ]);
    let config = StepConfig {
        min_gap_double_tap: NoteGap::Fourth,
        ..StepConfig::default()
    };
    let chart = build_chart(&song, &map, &config, "Challenge", RngMock([0]))
        .unwrap()
        .chart;
    assert_eq!(first_rows(&chart, 2), vec!["1000", "0100"]);
}

#[test]
fn two_hands_make_a_jump() {
    let song = SongMetadata::new("Song", 120.0);
    let map = DifficultyMap::new(vec![
        RawNoteEvent::normal(0.0, lane(0), Hand::Left),
        RawNoteEvent::normal(0.0, lane(2), Hand::Right),
    ]);
    let config = StepConfig {
        jump_mode: JumpMode::TwoHands,
        hands_allowed: false,
        ..StepConfig::default()
    };
    let chart = build_chart(&song, &map, &config, "Challenge", RngMock([0]))
        .unwrap()
        .chart;
    assert_eq!(first_rows(&chart, 1), vec!["1010"]);
    assert_eq!(chart.stats.jump, 1);
}

#[test]
fn swing_through_two_notes_makes_a_jump() {
    let song = SongMetadata::new("Song", 120.0);
    let map = DifficultyMap::new(vec![
        RawNoteEvent::normal(0.0, lane(1), Hand::Right),
        RawNoteEvent::normal(0.0, lane(2), Hand::Right),
        RawNoteEvent::normal(0.0, lane(0), Hand::Left),
    ]);
    let chart = build_chart(&song, &map, &StepConfig::default(), "Challenge", RngMock([0]))
        .unwrap()
        .chart;
    assert_eq!(first_rows(&chart, 1), vec!["0110"]);
}

#[test]
fn no_randomness_ignores_the_generator() {
    let song = SongMetadata::new("Song", 140.0);
    let notes = (0..64)
        .map(|i| RawNoteEvent::normal(f64::from(i) / 2.0, lane((i % 2) as u8), Hand::Left))
        .collect();
    let map = DifficultyMap::new(notes);
    let config = StepConfig {
        randomness: RandomnessLevel::None,
        ..StepConfig::default()
    };
    let a = build_chart(&song, &map, &config, "Hard", RngMock([0, 1])).unwrap();
    let b = build_chart(&song, &map, &config, "Hard", RngMock([2, 2, 0])).unwrap();
    assert_eq!(a, b);
}

#[test]
fn randomness_varies_a_monotonous_stream() {
    let song = SongMetadata::new("Song", 140.0);
    let notes = (0..64)
        .map(|i| RawNoteEvent::normal(f64::from(i) * 2.0, lane(1), Hand::Left))
        .collect();
    let map = DifficultyMap::new(notes);
    let plain = StepConfig {
        crossover_allowed: true,
        ..StepConfig::default()
    };
    let varied = StepConfig {
        randomness: RandomnessLevel::High,
        ..plain.clone()
    };
    let plain = build_chart(&song, &map, &plain, "Hard", RngMock([0, 1, 2]))
        .unwrap()
        .chart;
    let varied = build_chart(&song, &map, &varied, "Hard", RngMock([0, 1, 2]))
        .unwrap()
        .chart;

    let lanes = |chart: &Chart| -> Vec<usize> {
        chart
            .ticks_with_beats()
            .filter_map(|(_, tick)| tick.taps().next())
            .map(Lane::index)
            .collect()
    };
    assert!(lanes(&plain).iter().all(|&lane| lane == 1));
    assert!(lanes(&varied).iter().any(|&lane| lane != 1));
    assert_eq!(plain.stats.tap, varied.stats.tap);
}
