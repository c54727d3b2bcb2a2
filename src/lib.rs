//! Converts Beat Saber beatmaps into StepMania `dance-single` charts.
//!
//! A beatmap is a list of notes cut by two sabers on a grid of four columns. This crate maps each
//! column to a lane of the dance pad, snaps the notes onto the beat grid and places them so that
//! the result can be stepped: no double taps with the same foot too fast, no crossovers unless
//! allowed, and jumps only where there is time to land them.
//!
//! The pipeline is:
//!
//! 1. [`saber`] reads `Info.dat` and the difficulty files (with the `saber` feature),
//! 2. [`chart::quantize`] snaps note times to the beat grid,
//! 3. [`chart::aggregate`] merges the notes of a timestamp into a row,
//! 4. [`chart::placement`] enforces the stepping rules and varies repetitive patterns,
//! 5. [`chart::assemble`] lays the rows out into measures and rates the chart,
//! 6. [`sm`] writes the `.sm` text.
//!
//! [`convert::convert`] runs all of it for a song.
//!
//! # Usage Example
//!
//! ```rust
//! use saber_step::prelude::*;
//!
//! let song = SongMetadata::new("Song", 120.0);
//! let notes = (0..8)
//!     .map(|i| RawNoteEvent::normal(i as f64 / 2.0, Lane::ALL[i % 4], Hand::Left))
//!     .collect();
//! let maps = [DifficultyMap::new(notes)];
//!
//! let conversion = convert(&song, &maps, &StepConfig::default(), RngMock([0])).unwrap();
//! assert_eq!(conversion.charts.len(), 1);
//! assert!(conversion.text.starts_with("#TITLE:Song;"));
//! ```
//!
//! # Features
//!
//! - `saber`: Beat Saber file reading, with `serde`. On by default.
//! - `rand`: [`chart::rng::RandRng`] and [`convert::convert_seeded`]. On by default.
//! - `diagnostics`: error reports with `ariadne`. On by default.
//! - `serde`: serialization of the song, config and chart types.
//! - `parallel`: builds the charts of a song in parallel with `rayon`.

pub mod beat;
pub mod chart;
pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod prelude;
#[cfg(feature = "saber")]
pub mod saber;
pub mod sm;
pub mod song;
