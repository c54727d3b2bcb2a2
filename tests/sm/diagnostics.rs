#![cfg(feature = "diagnostics")]

use saber_step::{
    diagnostics::{SimpleSource, ToAriadne, collect_sm_reports, emit_sm_warnings},
    sm::{SmReadWarning, parse_sm},
};

const BROKEN: &str = "\
#TITLE:Broken;
#OFFSET:zero;
#NOTES:
     dance-single:
     Hard:
     Hard:
     5:
     0,0,0,0,0:
10000
0400
;
";

#[test]
fn warnings_point_at_their_lines() {
    let output = parse_sm(BROKEN);
    assert_eq!(
        output.warnings,
        vec![
            SmReadWarning::InvalidNumber {
                tag: "OFFSET".into(),
                value: "zero".into(),
                line: 2
            },
            SmReadWarning::InvalidRow {
                row: "10000".into(),
                line: 3
            },
            SmReadWarning::UnsupportedNote { note: '4', line: 3 },
            SmReadWarning::MissingBpm,
        ]
    );

    let source = SimpleSource::new("broken.sm", BROKEN);
    assert_eq!(source.line_range(2), 15..28);
    let reports = collect_sm_reports("broken.sm", BROKEN, &output.warnings);
    assert_eq!(reports.len(), output.warnings.len());
}

#[test]
fn emit_does_not_panic() {
    let output = parse_sm(BROKEN);
    emit_sm_warnings("broken.sm", BROKEN, &output.warnings);
    emit_sm_warnings("empty.sm", "", &[]);
}

#[cfg(feature = "saber")]
#[test]
fn ingest_errors_render() {
    use saber_step::{diagnostics::emit_ingest_error, saber::parse_map};

    let source = "{\n  \"_version\": \"2.0.0\",\n  \"_notes\": 3\n}";
    let error = parse_map(source).unwrap_err();
    let simple = SimpleSource::new("Expert.dat", source);
    let mut rendered = Vec::new();
    error
        .to_report(&simple)
        .write(
            ("Expert.dat".to_string(), ariadne::Source::from(source)),
            &mut rendered,
        )
        .unwrap();
    let rendered = String::from_utf8(rendered).unwrap();
    assert!(rendered.contains("_notes"), "{rendered}");
    emit_ingest_error("Expert.dat", source, &error);
}
