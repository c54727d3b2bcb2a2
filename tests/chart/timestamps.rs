use saber_step::{
    chart::{
        Chart, ChartStats, Measure, SOUND_DELAY_COMPENSATION_SECONDS, ShiftDirection, Tick,
        shift_timing_difference,
    },
    song::Lane,
};

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} != {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
    }
}

fn chart() -> Chart {
    let mut first = Measure::empty();
    first.ticks[0] = Tick::from_taps(&[Lane::LEFT]);
    first.ticks[2] = Tick::from_taps(&[Lane::RIGHT]);
    let mut second = Measure {
        ticks: vec![Tick::EMPTY; 8],
    };
    second.ticks[3] = Tick::from_taps(&[Lane::LEFT, Lane::RIGHT]);
    let measures = vec![first, second];
    Chart {
        name: "Hard".into(),
        meter: 3,
        stats: ChartStats::from_measures(&measures),
        measures,
    }
}

#[test]
fn timestamps_of_tap_rows() {
    // beats 0, 2 and 5.5 at 2 beats per second
    let delay = SOUND_DELAY_COMPENSATION_SECONDS;
    assert_close(
        &chart().note_timestamps(120.0, 0.0),
        &[-delay, 1.0 - delay, 2.75 - delay],
    );
    assert_close(
        &chart().note_timestamps(120.0, 0.5),
        &[-0.5 - delay, 0.5 - delay, 2.25 - delay],
    );
}

#[test]
fn shift_is_one_note_long() {
    assert_eq!(shift_timing_difference(0, ShiftDirection::Forward, 120.0), 0.0);
    assert_close(
        &[
            shift_timing_difference(4, ShiftDirection::Forward, 120.0),
            shift_timing_difference(8, ShiftDirection::Backward, 120.0),
            shift_timing_difference(16, ShiftDirection::Forward, 150.0),
        ],
        &[0.5, -0.25, 0.1],
    );
}
