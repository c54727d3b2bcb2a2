//! The StepMania `.sm` format, for the charts generated by this crate.
//!
//! An `.sm` file is a list of `#TAG:value;` pairs. Song metadata comes first, then one `#NOTES`
//! tag per chart, whose value is split by `:` into the steps type, description, difficulty,
//! meter, groove radar and note data. Note data is a list of measures separated by `,`, and each
//! measure is a list of rows with one character per lane.
//!
//! Only `dance-single` charts with taps and mines are written. [`read`] reads them back, keeping
//! what it understands and warning about the rest.

pub mod read;
pub mod write;

pub use self::{
    read::{SmChart, SmOutput, SmReadWarning, parse_sm},
    write::write_sm,
};

/// Steps type of every chart written.
pub const STEPS_TYPE: &str = "dance-single";

/// Groove radar values written for every chart.
pub const RADAR_VALUES: &str = "0,0,0,0,0";

/// Sample length written when the song has no preview length, in seconds.
pub const DEFAULT_SAMPLE_LENGTH_SECONDS: f64 = 10.0;
