#![forbid(unsafe_code)]

//! Core: host contracts, geometry, value snapshots, and shared leaf state.

pub mod color;
pub mod config;
pub mod flags;
pub mod geometry;
pub mod hook;
pub mod host;
pub mod logging;
pub mod store;
pub mod time;
pub mod value;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, trace, trace_span, warn};
