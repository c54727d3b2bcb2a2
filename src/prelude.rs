//! Prelude module for the crate.
//!
//! You can use `use saber_step::prelude::*;` to import the commonly used types at once.

pub use crate::{
    beat::{BEATS_PER_MEASURE, Beat},
    chart::{
        Chart, ChartStats, Measure, ShiftDirection, Slot, Tick,
        assemble::{BuildWarning, ChartBuildOutput, build_chart},
        placement::{Foot, UnsettledPlacement},
        rng::{Rng, RngMock},
        shift_timing_difference,
    },
    config::{ConfigError, DroppedTapFoot, JumpMode, NoteGap, RandomnessLevel, StepConfig},
    convert::{ChartWarning, Conversion, ConvertError, convert},
    diagnostics::SimpleSource,
    sm::{SmChart, SmOutput, SmReadWarning, parse_sm, write_sm},
    song::{
        DifficultyMap, Hand, LANE_COUNT, Lane, MalformedInput, NoteKind, RawNoteEvent,
        SongMetadata,
    },
};

#[cfg(feature = "rand")]
pub use crate::{chart::rng::RandRng, convert::convert_seeded};

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{ToAriadne, emit_sm_warnings};

#[cfg(feature = "saber")]
pub use crate::saber::{
    BeatmapEntry, IngestError, IngestWarning, MapOutput, MapVersion, SaberInfo, parse_info,
    parse_map,
};
