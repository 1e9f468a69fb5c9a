#![forbid(unsafe_code)]

//! Detection kernel: per-node change classification and commit scanning.
//!
//! Everything here is deterministic and free of I/O and timing. The
//! interceptor walks one committed tree, classifies each rendered node with
//! the change detector, filters through the allow-list, and emits render
//! events to a consumer; the overlay crates take it from there.

pub mod allowlist;
pub mod change;
pub mod interceptor;
pub mod report;

pub use allowlist::{AllowList, TrackOptions};
pub use change::{
    Change, ChangeList, Render, RenderKind, detect_context_change, detect_props_change,
};
pub use interceptor::{CommitConsumer, scan_commit};
pub use report::{ComponentReport, ReportMap};
