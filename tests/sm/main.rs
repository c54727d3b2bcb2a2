//! Tests for `saber_step::sm` and its diagnostics.

mod diagnostics;
mod roundtrip;
