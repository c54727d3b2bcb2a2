use saber_step::saber::{IngestError, parse_info, parse_map};

#[test]
fn v4_is_rejected() {
    let source = r#"{ "version": "4.0.0", "colorNotes": [], "colorNotesData": [] }"#;
    assert_eq!(
        parse_map(source),
        Err(IngestError::UnsupportedMapVersion("4.0.0".into()))
    );
    let info = r#"{ "version": "4.0.0", "song": { "title": "Song" } }"#;
    assert_eq!(
        parse_info(info),
        Err(IngestError::UnsupportedMapVersion("4.0.0".into()))
    );
}

#[test]
fn unversioned_is_rejected() {
    assert_eq!(parse_map("{}"), Err(IngestError::MissingVersion));
}

#[test]
fn broken_json_has_position() {
    let source = "{\n  \"_version\": \"2.0.0\",\n  \"_notes\": [\n    { \"_time\": true }\n  ]\n}";
    let error = parse_map(source).unwrap_err();
    let IngestError::Json { path, line, .. } = &error else {
        panic!("expected a json error, got {error:?}");
    };
    assert_eq!(path, "_notes[0]._time");
    assert_eq!(*line, 4);
    assert!(error.to_string().starts_with("invalid map json at _notes[0]._time"));
}
