#![forbid(unsafe_code)]

//! Host-provided drawing and scheduling capabilities.
//!
//! The animator is surface-agnostic: a browser adapter backs
//! [`OutlineSurface`] with a canvas, a native adapter with whatever overlay
//! layer it owns. Text is assumed monospace; [`OutlineSurface::measure_text`]
//! sizes label background boxes.

use rlens_core::color::Rgb;
use rlens_core::geometry::RectF;

use crate::outline::ActiveOutline;

/// Size of a rendered text run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Advance width in pixels.
    pub width: f64,
    /// Line height in pixels.
    pub height: f64,
}

/// One drawing surface the overlay paints into.
pub trait OutlineSurface {
    /// Erase the whole surface. Called at the start of every tick.
    fn clear(&mut self);

    /// Measure `text` in the surface's monospace label font.
    fn measure_text(&self, text: &str) -> TextMetrics;

    /// Stroke and fill every rectangle as one combined path, in a single
    /// draw call. `fill_alpha` is always `0.1 × stroke_alpha`.
    fn draw_outline_path(
        &mut self,
        rects: &[RectF],
        color: Rgb,
        stroke_alpha: f32,
        fill_alpha: f32,
    );

    /// Draw one label: a background box at `background` with the text
    /// inset into it, both at `alpha`.
    fn draw_label(&mut self, text: &str, background: RectF, color: Rgb, alpha: f32);
}

/// Frame-callback scheduling capability.
///
/// `request_frame` arms the host's next visual-refresh callback; the host
/// then calls back into the engine's frame entry point. Requesting while a
/// frame is already armed must coalesce to one callback.
pub trait FrameScheduler {
    /// Arm the next visual-refresh callback.
    fn request_frame(&mut self);
}

/// Paint lifecycle notifications.
pub trait PaintEvents {
    /// An outline is about to be drawn for the first time.
    fn on_paint_start(&mut self, outline: &ActiveOutline) {
        let _ = outline;
    }

    /// An outline's fade completed and it was retired.
    fn on_paint_finish(&mut self, outline: &ActiveOutline) {
        let _ = outline;
    }
}

/// Paint listener that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPaintEvents;

impl PaintEvents for NoopPaintEvents {}
