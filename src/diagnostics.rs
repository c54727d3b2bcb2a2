//! Fancy diagnostics support using `ariadne`.
//!
//! Ingestion errors and `.sm` reader warnings carry lines and columns rather than spans. This
//! module turns them into byte ranges of the source text, so that `ariadne` can point at them.
//!
//! # Usage Example
//!
//! ```rust
//! # #[cfg(feature = "diagnostics")]
//! # {
//! use saber_step::{diagnostics::emit_sm_warnings, sm::parse_sm};
//!
//! let source = "#TITLE:Song;\n#OFFSET:abc;\n";
//! let output = parse_sm(source);
//!
//! emit_sm_warnings("song.sm", source, &output.warnings);
//! # }
//! ```

use std::ops::Range;

#[cfg(feature = "diagnostics")]
use ariadne::{Color, Label, Report, ReportKind, Source};

/// Simple source container that holds the filename and source text.
///
/// ```rust
/// use saber_step::diagnostics::SimpleSource;
///
/// let text = "{ \"_version\": \"2.0.0\" }";
/// let source = SimpleSource::new("Info.dat", text);
/// assert_eq!(source.text(), text);
/// assert_eq!(source.name(), "Info.dat");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Byte range of the `line`, from 1, without its line break.
    ///
    /// Out of range lines map to an empty range at the end of the text.
    #[must_use]
    pub fn line_range(&self, line: usize) -> Range<usize> {
        let mut start = 0;
        for (index, content) in self.text.split('\n').enumerate() {
            let end = start + content.len();
            if index + 1 == line {
                return start..end;
            }
            start = end + 1;
        }
        self.text.len()..self.text.len()
    }

    /// Byte range of one character at `line` and `column`, both from 1.
    #[must_use]
    pub fn position_range(&self, line: usize, column: usize) -> Range<usize> {
        let line_range = self.line_range(line);
        let offset = (line_range.start + column.saturating_sub(1)).min(line_range.end);
        let width = self
            .text
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        offset..offset + width
    }
}

/// Trait for converting errors and warnings to `ariadne::Report`.
#[cfg(feature = "diagnostics")]
pub trait ToAriadne {
    /// Convert error to ariadne Report.
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

#[cfg(all(feature = "diagnostics", feature = "saber"))]
impl ToAriadne for crate::saber::IngestError {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        use crate::saber::IngestError;

        let (range, title) = match self {
            IngestError::Json {
                path, line, column, ..
            } => {
                let range = if *line == 0 {
                    0..0
                } else {
                    src.position_range(*line, *column)
                };
                (range, format!("invalid value at `{path}`"))
            }
            IngestError::UnsupportedMapVersion(version) => {
                let quoted = format!("\"{version}\"");
                let range = src
                    .text()
                    .find(&quoted)
                    .map_or(0..0, |start| start..start + quoted.len());
                (range, "unsupported map version".to_string())
            }
            IngestError::MissingVersion => (0..0, "missing map version".to_string()),
        };
        build_report(src, ReportKind::Error, range, &title, self, Color::Red)
    }
}

#[cfg(feature = "diagnostics")]
impl ToAriadne for crate::sm::SmReadWarning {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        use crate::sm::SmReadWarning;

        let line = match self {
            SmReadWarning::UnterminatedTag { line, .. }
            | SmReadWarning::InvalidNumber { line, .. }
            | SmReadWarning::MalformedNotes { line, .. }
            | SmReadWarning::UnsupportedStepsType { line, .. }
            | SmReadWarning::InvalidRow { line, .. }
            | SmReadWarning::UnsupportedNote { line, .. } => Some(*line),
            SmReadWarning::MissingBpm => None,
        };
        let range = line.map_or(0..0, |line| src.line_range(line));
        build_report(
            src,
            ReportKind::Warning,
            range,
            "sm read warning",
            self,
            Color::Yellow,
        )
    }
}

/// Prints the error of reading a Beat Saber file.
#[cfg(all(feature = "diagnostics", feature = "saber"))]
pub fn emit_ingest_error(name: &str, source: &str, error: &crate::saber::IngestError) {
    let simple = SimpleSource::new(name, source);
    let _ = error
        .to_report(&simple)
        .print((name.to_string(), Source::from(source)));
}

/// Convenience method: batch render `SmReadWarning` list.
#[cfg(feature = "diagnostics")]
pub fn emit_sm_warnings<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a crate::sm::SmReadWarning>,
) {
    let simple = SimpleSource::new(name, source);
    let ariadne_source = Source::from(source);
    for w in warnings {
        let report = w.to_report(&simple);
        let _ = report.print((name.to_string(), ariadne_source.clone()));
    }
}

/// Collect `ariadne::Report` instances for a list of `SmReadWarning` without printing.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn collect_sm_reports<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a crate::sm::SmReadWarning>,
) -> Vec<Report<'a, (String, Range<usize>)>> {
    let simple = SimpleSource::new(name, source);
    warnings.into_iter().map(|w| w.to_report(&simple)).collect()
}
