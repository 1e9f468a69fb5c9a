#![forbid(unsafe_code)]

//! Overlay engine: geometry resolution, outline scheduling, and animation.
//!
//! Render events flow in from the detection kernel; merged, geometrically
//! tracked, alpha-faded outlines flow out to a host-provided drawing
//! surface. Everything runs on the host's cooperative thread, driven by its
//! per-frame callback; the engine requests frames only while it has work.

pub mod animator;
pub mod label;
pub mod outline;
pub mod resolve;
pub mod scheduler;
pub mod surface;

#[cfg(test)]
pub(crate) mod testutil;

pub use animator::OutlineAnimator;
pub use outline::{ActiveOutline, PendingOutline};
pub use resolve::GeometryResolver;
pub use scheduler::OutlineScheduler;
pub use surface::{FrameScheduler, NoopPaintEvents, OutlineSurface, PaintEvents, TextMetrics};
