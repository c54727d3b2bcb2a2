use pretty_assertions::assert_eq;
use saber_step::{
    chart::{Chart, rng::RngMock},
    config::{JumpMode, StepConfig},
    convert::convert,
    sm::{SmReadWarning, parse_sm, write_sm},
    song::{DifficultyMap, Hand, Lane, RawNoteEvent, SongMetadata},
};

fn song() -> SongMetadata {
    let mut song = SongMetadata::new("Round: Trip", 174.0);
    song.subtitle = Some("#2".into());
    song.artist = Some("Someone".into());
    song.genre = Some("Drum & Bass".into());
    song.music = Some("song.ogg".into());
    song.base_offset_seconds = 0.125;
    song.preview_start_seconds = Some(30.0);
    song.preview_length_seconds = Some(12.0);
    song
}

fn maps() -> Vec<DifficultyMap> {
    let dense = (0..96)
        .flat_map(|i| {
            // leave room before each chord so that it stays a jump
            if i % 6 == 5 {
                return vec![];
            }
            let time = f64::from(i) / 3.0;
            let lane = Lane::ALL[(i % 4) as usize];
            let mut notes = vec![RawNoteEvent::normal(time, lane, Hand::Left)];
            if i % 6 == 0 {
                notes.push(RawNoteEvent::normal(time, lane.rotated(), Hand::Right));
            }
            if i % 10 == 5 {
                notes.push(RawNoteEvent::mine(time, lane.rotated().rotated()));
            }
            notes
        })
        .collect();
    let sparse = (0..24)
        .map(|i| RawNoteEvent::normal(f64::from(i) * 2.0, Lane::ALL[(i % 4) as usize], Hand::Right))
        .collect();
    vec![DifficultyMap::new(sparse), DifficultyMap::new(dense)]
}

#[test]
fn converted_song_reads_back() {
    let config = StepConfig {
        jump_mode: JumpMode::TwoHands,
        ..StepConfig::default()
    };
    let song = song();
    let conversion = convert(&song, &maps(), &config, RngMock([1])).unwrap();
    let output = parse_sm(&conversion.text);

    assert!(output.warnings.is_empty(), "{:?}", output.warnings);
    assert_eq!(output.song, song);

    let charts: Vec<Chart> = output.charts.into_iter().map(|chart| chart.into_chart()).collect();
    assert_eq!(charts.len(), 2);
    for (read, written) in charts.iter().zip(&conversion.charts) {
        assert_eq!(read.stats, written.stats);
        assert_eq!(read, written);
    }
    assert!(charts[0].stats.jump > 0);
    assert!(charts[0].stats.mine > 0);
}

#[test]
fn rewrite_is_identical() {
    let conversion = convert(&song(), &maps(), &StepConfig::default(), RngMock([0])).unwrap();
    let output = parse_sm(&conversion.text);
    let charts: Vec<Chart> = output.charts.into_iter().map(|chart| chart.into_chart()).collect();
    assert_eq!(write_sm(&output.song, &charts), conversion.text);
}

#[test]
fn urls_in_metadata_survive() {
    let mut song = SongMetadata::new("AC//DC", 120.0);
    song.credit = Some("https://example.org/maps///1".into());
    let output = parse_sm(&write_sm(&song, &[]));
    assert!(output.warnings.is_empty(), "{:?}", output.warnings);
    assert_eq!(output.song.title, "AC//DC");
    assert_eq!(output.song.credit, song.credit);
}

#[test]
fn foreign_charts_are_skipped() {
    let source = "\
#TITLE:Foreign;
#BPMS:0.000=140.000,16.000=70.000;
#NOTES:
     dance-double:
     :
     Hard:
     8:
     0,0,0,0,0:
00000000
00000000
00000000
00000000
;
#NOTES:
     dance-single:
     Hard:
     Hard:
     8:
     0,0,0,0,0:
1000
0200
0030
000M
;
";
    let output = parse_sm(source);
    assert_eq!(output.song.bpm, 140.0);
    assert_eq!(output.charts.len(), 1);
    let chart = output.charts[0].clone().into_chart();
    assert_eq!(chart.stats.tap, 1);
    assert_eq!(chart.stats.mine, 1);
    assert_eq!(
        output.warnings,
        vec![
            SmReadWarning::UnsupportedStepsType {
                steps_type: "dance-double".into(),
                line: 3
            },
            SmReadWarning::UnsupportedNote { note: '2', line: 14 },
            SmReadWarning::UnsupportedNote { note: '3', line: 14 },
        ]
    );
}
