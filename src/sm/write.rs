//! Formatting charts into `.sm` text.

use std::fmt::{self, Display, Formatter};

use super::{DEFAULT_SAMPLE_LENGTH_SECONDS, RADAR_VALUES, STEPS_TYPE};
use crate::{
    chart::{Chart, Measure},
    song::SongMetadata,
};

/// Writes `value` escaping the characters delimiting tags.
///
/// The second `/` of a `//` pair is escaped too, otherwise it would start a comment.
fn write_escaped(f: &mut Formatter<'_>, value: &str) -> fmt::Result {
    let mut previous = None;
    for c in value.chars() {
        if matches!(c, ':' | ';' | '#' | '\\') || (c == '/' && previous == Some('/')) {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
        previous = Some(c);
    }
    Ok(())
}

/// Beat Saber ships its music as `.egg`, which is an Ogg Vorbis file under another name.
fn music_file_name(music: &str) -> String {
    match music.strip_suffix(".egg") {
        Some(stem) => format!("{stem}.ogg"),
        None => music.to_string(),
    }
}

/// A song with its charts, displayed as the `.sm` text.
///
/// Output is stable: the same input always formats to the same bytes.
#[derive(Debug, Clone, Copy)]
pub struct SmFile<'a> {
    /// Song metadata for the header.
    pub song: &'a SongMetadata,
    /// Charts, written in order.
    pub charts: &'a [Chart],
}

impl SmFile<'_> {
    fn write_tag(f: &mut Formatter<'_>, tag: &str, value: Option<&str>) -> fmt::Result {
        write!(f, "#{tag}:")?;
        if let Some(value) = value {
            write_escaped(f, value)?;
        }
        writeln!(f, ";")
    }

    fn write_header(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let song = self.song;
        Self::write_tag(f, "TITLE", Some(&song.title))?;
        Self::write_tag(f, "SUBTITLE", song.subtitle.as_deref())?;
        Self::write_tag(f, "ARTIST", song.artist.as_deref())?;
        Self::write_tag(f, "TITLETRANSLIT", None)?;
        Self::write_tag(f, "SUBTITLETRANSLIT", None)?;
        Self::write_tag(f, "ARTISTTRANSLIT", None)?;
        Self::write_tag(f, "GENRE", song.genre.as_deref())?;
        Self::write_tag(f, "CREDIT", song.credit.as_deref())?;
        Self::write_tag(f, "BANNER", song.banner.as_deref())?;
        Self::write_tag(f, "BACKGROUND", song.background.as_deref())?;
        Self::write_tag(f, "LYRICSPATH", None)?;
        Self::write_tag(f, "CDTITLE", None)?;
        let music = song.music.as_deref().map(music_file_name);
        Self::write_tag(f, "MUSIC", music.as_deref())?;
        writeln!(f, "#OFFSET:{:.6};", song.base_offset_seconds)?;
        writeln!(
            f,
            "#SAMPLESTART:{:.6};",
            song.preview_start_seconds.unwrap_or(0.0)
        )?;
        writeln!(
            f,
            "#SAMPLELENGTH:{:.6};",
            song.preview_length_seconds
                .unwrap_or(DEFAULT_SAMPLE_LENGTH_SECONDS)
        )?;
        writeln!(f, "#SELECTABLE:YES;")?;
        writeln!(f, "#BPMS:0.000000={:.6};", song.bpm)?;
        for tag in ["STOPS", "BGCHANGES", "FGCHANGES", "KEYSOUNDS", "ATTACKS"] {
            Self::write_tag(f, tag, None)?;
        }
        Ok(())
    }

    fn write_measure(f: &mut Formatter<'_>, measure: &Measure) -> fmt::Result {
        for (index, tick) in measure.ticks.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{tick}")?;
        }
        Ok(())
    }

    fn write_notes(f: &mut Formatter<'_>, chart: &Chart) -> fmt::Result {
        writeln!(f, "#NOTES:")?;
        writeln!(f, "//---------------{STEPS_TYPE} - ----------------")?;
        writeln!(f, "     {STEPS_TYPE}:")?;
        write!(f, "     ")?;
        write_escaped(f, &chart.name)?;
        writeln!(f, ":")?;
        write!(f, "     ")?;
        write_escaped(f, chart.difficulty())?;
        writeln!(f, ":")?;
        writeln!(f, "     {}:", chart.meter)?;
        writeln!(f, "     {RADAR_VALUES}:")?;
        for (index, measure) in chart.measures.iter().enumerate() {
            if index > 0 {
                writeln!(f, "\n,")?;
            }
            Self::write_measure(f, measure)?;
        }
        writeln!(f, "\n;")
    }
}

impl Display for SmFile<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        for chart in self.charts {
            writeln!(f)?;
            Self::write_notes(f, chart)?;
        }
        Ok(())
    }
}

/// Formats `song` and its `charts` as `.sm` text.
#[must_use]
pub fn write_sm(song: &SongMetadata, charts: &[Chart]) -> String {
    SmFile { song, charts }.to_string()
}
