//! Tests for `saber_step::chart`.

mod properties;
mod scenarios;
mod timestamps;
