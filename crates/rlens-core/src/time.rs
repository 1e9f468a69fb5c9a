#![forbid(unsafe_code)]

//! Clock types shared across the engine.
//!
//! `Instant` comes from `web-time` so the engine keeps working on
//! `wasm32-unknown-unknown`, where `std::time::Instant` panics. Engine entry
//! points take `now` as a parameter instead of reading the clock themselves,
//! which keeps every time-dependent path drivable from tests.

pub use std::time::Duration;
pub use web_time::Instant;
