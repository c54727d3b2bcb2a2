use pretty_assertions::assert_eq;
use saber_step::{
    chart::rng::RngMock,
    config::StepConfig,
    convert::convert,
    saber::{IngestWarning, MapVersion, parse_info, parse_map},
    sm::parse_sm,
    song::{DifficultyMap, Hand, Lane, NoteKind},
};

const INFO: &str = include_str!("../files/sample_song/Info.dat");
const HARD: &str = include_str!("../files/sample_song/HardStandard.dat");
const EXPERT: &str = include_str!("../files/sample_song/ExpertStandard.dat");

fn rows(measure: &saber_step::chart::Measure) -> Vec<String> {
    measure.ticks.iter().map(ToString::to_string).collect()
}

fn load_maps() -> Vec<DifficultyMap> {
    let info = parse_info(INFO).expect("Info.dat must be parsed");
    info.standard_beatmaps()
        .map(|entry| {
            let source = match entry.filename.as_str() {
                "HardStandard.dat" => HARD,
                "ExpertStandard.dat" => EXPERT,
                other => panic!("unexpected beatmap {other}"),
            };
            let mut map = parse_map(source).expect("beatmap must be parsed").map;
            map.source_label = Some(entry.difficulty.clone());
            map
        })
        .collect()
}

#[test]
fn info_of_sample_song() {
    let info = parse_info(INFO).unwrap();
    assert_eq!(info.version, "2.0.0");
    assert_eq!(info.beatmaps.len(), 3);
    assert_eq!(info.standard_beatmaps().count(), 2);

    let song = info.song_metadata();
    assert_eq!(song.title, "Sample Song");
    assert_eq!(song.subtitle.as_deref(), Some("Extended Mix"));
    assert_eq!(song.artist.as_deref(), Some("Sample Artist"));
    assert_eq!(song.credit.as_deref(), Some("Sample Mapper"));
    assert_eq!(song.bpm, 120.0);
    assert_eq!(song.preview_length_seconds, Some(10.0));
    assert_eq!(song.banner.as_deref(), Some("cover.jpg"));
    assert_eq!(song.background.as_deref(), Some("cover.jpg"));
}

#[test]
fn v2_beatmap() {
    let output = parse_map(HARD).unwrap();
    assert_eq!(output.version, MapVersion::V2);
    assert_eq!(output.map.notes.len(), 7);
    assert_eq!(output.warnings, vec![IngestWarning::IgnoredObstacles(1)]);

    let mines: Vec<_> = output.map.notes.iter().filter(|note| note.is_mine()).collect();
    assert_eq!(mines.len(), 1);
    assert_eq!(mines[0].lane, Lane::new(1).unwrap());
    assert_eq!(mines[0].time, 8.0);
}

#[test]
fn v3_beatmap() {
    let output = parse_map(EXPERT).unwrap();
    assert_eq!(output.version, MapVersion::V3);
    assert!(output.warnings.is_empty());
    assert_eq!(output.map.notes.len(), 10);
    assert_eq!(output.map.notes[1].kind, NoteKind::Normal(Hand::Right));
    assert_eq!(output.map.notes[1].lane, Lane::RIGHT);
    assert_eq!(output.map.last_time(), Some(9.0));
}

#[test]
fn sample_song_converts() {
    let song = parse_info(INFO).unwrap().song_metadata();
    let maps = load_maps();
    let conversion = convert(&song, &maps, &StepConfig::default(), RngMock([0])).unwrap();

    let names: Vec<_> = conversion.charts.iter().map(|chart| chart.name.as_str()).collect();
    assert_eq!(names, vec!["Challenge", "Hard"]);
    assert!(conversion.warnings.is_empty());

    let expert = &conversion.charts[0];
    assert_eq!(expert.measures.len(), 3);
    assert_eq!(rows(&expert.measures[0]), vec!["0000"; 4]);
    assert_eq!(
        rows(&expert.measures[1]),
        vec!["1000", "0001", "0100", "0010", "1000", "0001", "0100", "0010"]
    );
    assert_eq!(rows(&expert.measures[2]), vec!["1000", "00M0", "0000", "0000"]);
    assert_eq!(expert.stats.tap, 9);
    assert_eq!(expert.stats.mine, 1);

    let hard = &conversion.charts[1];
    assert_eq!(hard.measures.len(), 3);
    assert_eq!(rows(&hard.measures[1]), vec!["1000", "0001", "0100", "0010"]);
    assert_eq!(rows(&hard.measures[2]), vec!["1M00", "0000", "0000", "0000"]);
    assert_eq!(hard.stats.jump, 0);

    let read = parse_sm(&conversion.text);
    assert!(read.warnings.is_empty(), "{:?}", read.warnings);
    assert_eq!(read.song.music.as_deref(), Some("song.ogg"));
    let charts: Vec<_> = read.charts.into_iter().map(|chart| chart.into_chart()).collect();
    assert_eq!(charts, conversion.charts);
}
