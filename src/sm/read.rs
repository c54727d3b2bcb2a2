//! Reading `.sm` text back into charts.
//!
//! Reading is fault tolerant: anything not understood is reported as a [`SmReadWarning`] and
//! skipped or replaced, so a hand-edited file still gives as much as it can.

use std::str::Chars;

use thiserror::Error;

use super::STEPS_TYPE;
use crate::{
    chart::{Chart, ChartStats, Measure, Slot, Tick},
    song::{LANE_COUNT, SongMetadata},
};

/// Something in the `.sm` text that was skipped or replaced.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum SmReadWarning {
    /// A tag was not closed by `;` before the next tag or the end of the text.
    #[error("tag #{name} at line {line} is not terminated by ';'")]
    UnterminatedTag {
        /// Name of the tag.
        name: String,
        /// Line of the tag, from 1.
        line: usize,
    },
    /// A numeric value could not be parsed. A default was used instead.
    #[error("tag #{tag} at line {line} has an invalid number: {value:?}")]
    InvalidNumber {
        /// Name of the tag.
        tag: String,
        /// The value as written.
        value: String,
        /// Line of the tag, from 1.
        line: usize,
    },
    /// There is no `#BPMS` entry at beat 0.
    #[error("no bpm is defined")]
    MissingBpm,
    /// A `#NOTES` tag does not have the 6 fields of a chart.
    #[error("#NOTES at line {line} has {fields} fields instead of 6")]
    MalformedNotes {
        /// Number of fields found.
        fields: usize,
        /// Line of the tag, from 1.
        line: usize,
    },
    /// A chart is not `dance-single`, and was skipped.
    #[error("chart at line {line} has unsupported steps type {steps_type:?}")]
    UnsupportedStepsType {
        /// The steps type as written.
        steps_type: String,
        /// Line of the tag, from 1.
        line: usize,
    },
    /// A row does not have one character per lane. It was read as an empty row.
    #[error("row {row:?} of the chart at line {line} does not have 4 lanes")]
    InvalidRow {
        /// The row as written.
        row: String,
        /// Line of the tag, from 1.
        line: usize,
    },
    /// A note type other than tap or mine, such as a hold head. It was read as empty.
    #[error("note {note:?} of the chart at line {line} is not supported")]
    UnsupportedNote {
        /// The character of the note.
        note: char,
        /// Line of the tag, from 1.
        line: usize,
    },
}

/// One `#NOTES` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmChart {
    /// Steps type, always `dance-single` for charts read successfully.
    pub steps_type: String,
    /// Description, which holds the chart name for files written by this crate.
    pub description: String,
    /// Difficulty such as `Hard`.
    pub difficulty: String,
    /// Difficulty rating.
    pub meter: u32,
    /// Note data.
    pub measures: Vec<Measure>,
}

impl SmChart {
    /// Converts into a [`Chart`] named by the description, recounting its statistics.
    #[must_use]
    pub fn into_chart(self) -> Chart {
        let stats = ChartStats::from_measures(&self.measures);
        Chart {
            name: self.description,
            meter: self.meter,
            measures: self.measures,
            stats,
        }
    }
}

/// Output of [`parse_sm`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct SmOutput {
    /// Song metadata. The bpm is 0 when the file defines none.
    pub song: SongMetadata,
    /// Charts in file order.
    pub charts: Vec<SmChart>,
    /// Things skipped or replaced while reading.
    pub warnings: Vec<SmReadWarning>,
}

/// A `#NAME:param:param;` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SmTag {
    name: String,
    params: Vec<String>,
    line: usize,
}

/// Walks through `.sm` text, skipping comments and resolving escapes.
struct Cursor<'a> {
    chars: std::iter::Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Skips a `//` comment if the cursor is on one, leaving the line break.
    fn skip_comment(&mut self, c: char) -> bool {
        if c != '/' || self.chars.peek() != Some(&'/') {
            return false;
        }
        while self.chars.peek().is_some_and(|&next| next != '\n') {
            self.chars.next();
        }
        true
    }

    /// Reads the next tag, or `None` at the end of the text.
    fn next_tag(&mut self, warnings: &mut Vec<SmReadWarning>) -> Option<SmTag> {
        loop {
            let c = self.bump()?;
            if self.skip_comment(c) {
                continue;
            }
            if c == '#' {
                break;
            }
        }
        let line = self.line;
        let mut params = Vec::new();
        let mut current = String::new();
        let mut at_line_start = false;
        loop {
            let Some(c) = self.chars.peek().copied() else {
                params.push(current);
                return Some(self.finish(params, line, false, warnings));
            };
            if c == '#' && at_line_start {
                // the next tag starts while this one is still open
                params.push(current);
                return Some(self.finish(params, line, false, warnings));
            }
            self.bump();
            if self.skip_comment(c) {
                continue;
            }
            match c {
                ':' => params.push(std::mem::take(&mut current)),
                ';' => {
                    params.push(current);
                    return Some(self.finish(params, line, true, warnings));
                }
                '\\' => {
                    if let Some(escaped) = self.bump() {
                        current.push(escaped);
                    }
                }
                _ => current.push(c),
            }
            at_line_start = c == '\n' || (at_line_start && c.is_whitespace());
        }
    }

    fn finish(
        &self,
        mut params: Vec<String>,
        line: usize,
        terminated: bool,
        warnings: &mut Vec<SmReadWarning>,
    ) -> SmTag {
        let name = if params.is_empty() {
            String::new()
        } else {
            params.remove(0).trim().to_uppercase()
        };
        if !terminated {
            warnings.push(SmReadWarning::UnterminatedTag {
                name: name.clone(),
                line,
            });
        }
        SmTag { name, params, line }
    }
}

impl SmTag {
    fn value(&self) -> &str {
        self.params.first().map_or("", |value| value.trim())
    }

    fn text(&self) -> Option<String> {
        Some(self.value())
            .filter(|value| !value.is_empty())
            .map(ToString::to_string)
    }

    fn number(&self, warnings: &mut Vec<SmReadWarning>) -> Option<f64> {
        let value = self.value();
        if value.is_empty() {
            return None;
        }
        match value.parse() {
            Ok(number) => Some(number),
            Err(_) => {
                warnings.push(self.invalid_number(value));
                None
            }
        }
    }

    fn invalid_number(&self, value: &str) -> SmReadWarning {
        SmReadWarning::InvalidNumber {
            tag: self.name.clone(),
            value: value.to_string(),
            line: self.line,
        }
    }
}

/// Bpm at beat 0 of a `#BPMS` value like `0.000=128.000,16.000=140.000`.
fn first_bpm(tag: &SmTag, warnings: &mut Vec<SmReadWarning>) -> Option<f64> {
    let (beat, bpm) = tag.value().split(',').next()?.split_once('=')?;
    match (beat.trim().parse::<f64>(), bpm.trim().parse::<f64>()) {
        (Ok(beat), Ok(bpm)) if beat.abs() < 1e-9 => Some(bpm),
        (Ok(_), Ok(_)) => None,
        _ => {
            warnings.push(tag.invalid_number(tag.value()));
            None
        }
    }
}

fn parse_row(row: &str, line: usize, warnings: &mut Vec<SmReadWarning>) -> Tick {
    if row.chars().count() != LANE_COUNT {
        warnings.push(SmReadWarning::InvalidRow {
            row: row.to_string(),
            line,
        });
        return Tick::EMPTY;
    }
    let mut tick = Tick::EMPTY;
    for (slot, note) in tick.0.iter_mut().zip(row.chars()) {
        *slot = match note {
            '0' => Slot::Empty,
            '1' => Slot::Tap,
            'M' => Slot::Mine,
            other => {
                warnings.push(SmReadWarning::UnsupportedNote { note: other, line });
                Slot::Empty
            }
        };
    }
    tick
}

fn parse_measures(data: &str, line: usize, warnings: &mut Vec<SmReadWarning>) -> Vec<Measure> {
    data.split(',')
        .map(|measure| Measure {
            ticks: measure
                .lines()
                .map(str::trim)
                .filter(|row| !row.is_empty())
                .map(|row| parse_row(row, line, warnings))
                .collect(),
        })
        .collect()
}

fn parse_notes(tag: &SmTag, warnings: &mut Vec<SmReadWarning>) -> Option<SmChart> {
    let [steps_type, description, difficulty, meter, _radar, data] = tag.params.as_slice() else {
        warnings.push(SmReadWarning::MalformedNotes {
            fields: tag.params.len(),
            line: tag.line,
        });
        return None;
    };
    let steps_type = steps_type.trim();
    if steps_type != STEPS_TYPE {
        warnings.push(SmReadWarning::UnsupportedStepsType {
            steps_type: steps_type.to_string(),
            line: tag.line,
        });
        return None;
    }
    let meter = meter.trim().parse().unwrap_or_else(|_| {
        warnings.push(tag.invalid_number(meter.trim()));
        1
    });
    Some(SmChart {
        steps_type: steps_type.to_string(),
        description: description.trim().to_string(),
        difficulty: difficulty.trim().to_string(),
        meter,
        measures: parse_measures(data, tag.line, warnings),
    })
}

/// Parses `.sm` text.
///
/// Tags other than the song metadata this crate writes and `#NOTES` are ignored.
pub fn parse_sm(source: &str) -> SmOutput {
    let mut warnings = Vec::new();
    let mut cursor = Cursor::new(source);
    let mut song = SongMetadata::new(String::new(), 0.0);
    let mut bpm = None;
    let mut charts = Vec::new();

    while let Some(tag) = cursor.next_tag(&mut warnings) {
        match tag.name.as_str() {
            "TITLE" => song.title = tag.value().to_string(),
            "SUBTITLE" => song.subtitle = tag.text(),
            "ARTIST" => song.artist = tag.text(),
            "GENRE" => song.genre = tag.text(),
            "CREDIT" => song.credit = tag.text(),
            "MUSIC" => song.music = tag.text(),
            "BANNER" => song.banner = tag.text(),
            "BACKGROUND" => song.background = tag.text(),
            "OFFSET" => song.base_offset_seconds = tag.number(&mut warnings).unwrap_or(0.0),
            "SAMPLESTART" => song.preview_start_seconds = tag.number(&mut warnings),
            "SAMPLELENGTH" => song.preview_length_seconds = tag.number(&mut warnings),
            "BPMS" => bpm = bpm.or_else(|| first_bpm(&tag, &mut warnings)),
            "NOTES" => charts.extend(parse_notes(&tag, &mut warnings)),
            _ => {}
        }
    }

    match bpm {
        Some(bpm) => song.bpm = bpm,
        None => warnings.push(SmReadWarning::MissingBpm),
    }
    SmOutput {
        song,
        charts,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tags(source: &str) -> (Vec<SmTag>, Vec<SmReadWarning>) {
        let mut warnings = Vec::new();
        let mut cursor = Cursor::new(source);
        let mut tags = Vec::new();
        while let Some(tag) = cursor.next_tag(&mut warnings) {
            tags.push(tag);
        }
        (tags, warnings)
    }

    #[test]
    fn splits_tags_and_params() {
        let (tags, warnings) = tags("// header\n#TITLE:a\\:b;\n#NOTES:x: y :z;\n");
        assert_eq!(
            tags,
            vec![
                SmTag {
                    name: "TITLE".into(),
                    params: vec!["a:b".into()],
                    line: 2,
                },
                SmTag {
                    name: "NOTES".into(),
                    params: vec!["x".into(), " y ".into(), "z".into()],
                    line: 3,
                },
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn unterminated_tag_ends_at_the_next_tag() {
        let (tags, warnings) = tags("#TITLE:Song\n#ARTIST:Someone;");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].value(), "Song");
        assert_eq!(tags[1].value(), "Someone");
        assert_eq!(
            warnings,
            vec![SmReadWarning::UnterminatedTag {
                name: "TITLE".into(),
                line: 1,
            }]
        );
    }

    #[test]
    fn reads_song_fields() {
        let output = parse_sm(
            "#TITLE:Song;\n#ARTIST:;\n#OFFSET:-0.125000;\n#SAMPLELENGTH:12;\n\
             #BPMS:0.000000=150.000000,32.000=160.000;\n",
        );
        assert_eq!(output.song.title, "Song");
        assert_eq!(output.song.artist, None);
        assert_eq!(output.song.base_offset_seconds, -0.125);
        assert_eq!(output.song.preview_length_seconds, Some(12.0));
        assert_eq!(output.song.bpm, 150.0);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn missing_bpm_is_warned() {
        let output = parse_sm("#TITLE:Song;\n");
        assert_eq!(output.song.bpm, 0.0);
        assert_eq!(output.warnings, vec![SmReadWarning::MissingBpm]);
    }

    #[test]
    fn reads_notes_with_unsupported_parts() {
        let source = "\
#BPMS:0=120;
#NOTES:
//---------------dance-single - ----------------
     dance-single:
     Hard:
     Hard:
     x:
     0,0,0,0,0:
1000
0M20
00000
0001
;
#NOTES:
     dance-double:
     :
     Hard:
     5:
     0,0,0,0,0:
00000000
;
";
        let output = parse_sm(source);
        assert_eq!(output.charts.len(), 1);
        let chart = output.charts[0].clone().into_chart();
        assert_eq!(chart.name, "Hard");
        assert_eq!(chart.meter, 1);
        let rows: Vec<_> = chart.measures[0]
            .ticks
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rows, vec!["1000", "0M00", "0000", "0001"]);
        assert_eq!(chart.stats.tap, 2);
        assert_eq!(chart.stats.mine, 1);
        assert_eq!(
            output.warnings,
            vec![
                SmReadWarning::InvalidNumber {
                    tag: "NOTES".into(),
                    value: "x".into(),
                    line: 2,
                },
                SmReadWarning::UnsupportedNote { note: '2', line: 2 },
                SmReadWarning::InvalidRow {
                    row: "00000".into(),
                    line: 2,
                },
                SmReadWarning::UnsupportedStepsType {
                    steps_type: "dance-double".into(),
                    line: 14,
                },
            ]
        );
    }
}
