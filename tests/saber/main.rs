//! Tests for `saber_step::saber`.

#![cfg(feature = "saber")]

mod files;
mod versions;
