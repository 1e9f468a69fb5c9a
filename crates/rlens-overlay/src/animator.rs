#![forbid(unsafe_code)]

//! Per-frame outline animation.
//!
//! The animator owns the active-outline set. Each tick recomputes every
//! outline's alpha, color, and label, accumulates all rectangles into one
//! combined path stroked and filled in a single draw call, draws labels for
//! outlines still classified unstable, and retires outlines whose fade ran
//! out. It requests another tick only while outlines remain; there is no
//! idle polling.

use std::collections::BTreeMap;

use rlens_core::color::{Rgb, lerp_color};
use rlens_core::config::Options;
use rlens_core::geometry::{RectF, RegionKey};
use rlens_core::host::LayoutHost;
use rlens_core::time::Instant;

use crate::label::label_text;
use crate::outline::{ActiveOutline, PendingOutline};
use crate::resolve::GeometryResolver;
use crate::surface::{FrameScheduler, OutlineSurface, PaintEvents};

/// Fade length for a one-off render: a quick flash.
pub const STABLE_TOTAL_FRAMES: u32 = 5;

/// Fade length for an unstable outline: a persistent highlight.
pub const UNSTABLE_TOTAL_FRAMES: u32 = 60;

/// Peak stroke alpha for a one-off render.
pub const STABLE_BASE_ALPHA: f32 = 0.2;

/// Peak stroke alpha for an unstable outline.
pub const UNSTABLE_BASE_ALPHA: f32 = 0.8;

/// Fill alpha as a fraction of stroke alpha.
pub const FILL_ALPHA_RATIO: f32 = 0.1;

/// Outline color at render count zero.
pub const START_COLOR: Rgb = Rgb::new(115, 97, 230);

/// Outline color once the render count saturates `max_renders`.
pub const END_COLOR: Rgb = Rgb::new(185, 49, 115);

const LABEL_PAD_X: f64 = 4.0;
const LABEL_PAD_Y: f64 = 2.0;

/// Color for an outline that accumulated `render_count` renders.
#[must_use]
pub fn outline_color(render_count: u32, max_renders: u32) -> Rgb {
    let t = if max_renders == 0 {
        1.0
    } else {
        render_count as f32 / max_renders as f32
    };
    lerp_color(START_COLOR, END_COLOR, t.clamp(0.0, 1.0))
}

/// Owns and animates the active-outline set.
#[derive(Debug, Default)]
pub struct OutlineAnimator {
    active: BTreeMap<RegionKey, ActiveOutline>,
    next_outline_id: u64,
}

impl OutlineAnimator {
    /// Create an empty animator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no outline is active.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Number of active outlines.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Look up an active outline by region key.
    #[inline]
    pub fn get(&self, key: &RegionKey) -> Option<&ActiveOutline> {
        self.active.get(key)
    }

    /// Take ownership of a pending outline.
    ///
    /// A new region key creates an [`ActiveOutline`] and announces it via
    /// [`PaintEvents::on_paint_start`]; a key whose fade is still running
    /// merges instead, extending the render list and restarting the fade.
    pub fn ingest(
        &mut self,
        outline: PendingOutline,
        key: RegionKey,
        now: Instant,
        events: &mut dyn PaintEvents,
    ) {
        match self.active.entry(key) {
            std::collections::btree_map::Entry::Occupied(mut entry) => {
                entry.get_mut().merge(outline, now);
            }
            std::collections::btree_map::Entry::Vacant(entry) => {
                let active = ActiveOutline {
                    outline,
                    id: format!("outline-{}", self.next_outline_id),
                    alpha: 0.0,
                    frame: 0,
                    total_frames: STABLE_TOTAL_FRAMES,
                    color: START_COLOR,
                    text: None,
                    updated_at: now,
                };
                self.next_outline_id += 1;
                events.on_paint_start(&active);
                entry.insert(active);
            }
        }
    }

    /// Best-effort geometry refresh for every active outline. A resolution
    /// miss keeps the last known measurement; it never retires an outline.
    pub fn refresh_geometry(
        &mut self,
        resolver: &mut GeometryResolver,
        host: &dyn LayoutHost,
        now: Instant,
    ) {
        for outline in self.active.values_mut() {
            if let Some(measurement) = resolver.measure(host, outline.outline.target, now) {
                outline.outline.latest_measurement = measurement;
            }
        }
    }

    /// Run one animation frame.
    pub fn tick(
        &mut self,
        options: &Options,
        resolver: &mut GeometryResolver,
        host: &dyn LayoutHost,
        surface: &mut dyn OutlineSurface,
        frames: &mut dyn FrameScheduler,
        events: &mut dyn PaintEvents,
        now: Instant,
    ) {
        let span = tracing::trace_span!("animator_tick", active = self.active.len());
        let _guard = span.enter();

        surface.clear();
        if self.active.is_empty() {
            return;
        }

        let mut path: Vec<RectF> = Vec::with_capacity(self.active.len());
        let mut max_stroke_alpha: f32 = 0.0;
        let mut path_color = START_COLOR;
        let mut top_count = 0u32;
        let mut labels: Vec<(String, RectF, Rgb, f32)> = Vec::new();
        let mut expired: Vec<RegionKey> = Vec::new();

        for (key, active) in &mut self.active {
            if let Some(measurement) = resolver.measure(host, active.outline.target, now) {
                active.outline.latest_measurement = measurement;
            }

            let unstable = active.is_unstable(now, options.reset_count_timeout);
            active.total_frames = if unstable {
                UNSTABLE_TOTAL_FRAMES
            } else {
                STABLE_TOTAL_FRAMES
            };
            let base_alpha = if unstable {
                UNSTABLE_BASE_ALPHA
            } else {
                STABLE_BASE_ALPHA
            };
            let progress = active.frame as f32 / active.total_frames as f32;
            active.alpha = base_alpha * (1.0 - progress).clamp(0.0, 1.0);

            let count = active.outline.total_occurrences();
            active.color = outline_color(count, options.max_renders);

            let rect = active.outline.latest_measurement.bounds();
            path.push(rect);
            max_stroke_alpha = max_stroke_alpha.max(active.alpha);
            // The combined path takes the hue of the worst offender.
            if count > top_count {
                top_count = count;
                path_color = active.color;
            }

            if unstable {
                active.text = label_text(&active.outline.renders);
                if let Some(text) = &active.text {
                    let metrics = surface.measure_text(text);
                    let background = RectF::new(
                        rect.top - metrics.height - 2.0 * LABEL_PAD_Y,
                        rect.left,
                        metrics.width + 2.0 * LABEL_PAD_X,
                        metrics.height + 2.0 * LABEL_PAD_Y,
                    );
                    labels.push((text.clone(), background, active.color, active.alpha));
                }
            } else {
                active.text = None;
            }

            active.frame += 1;
            if active.is_expired() {
                expired.push(*key);
            }
        }

        surface.draw_outline_path(
            &path,
            path_color,
            max_stroke_alpha,
            max_stroke_alpha * FILL_ALPHA_RATIO,
        );
        for (text, background, color, alpha) in labels {
            surface.draw_label(&text, background, color, alpha);
        }

        for key in expired {
            if let Some(outline) = self.active.remove(&key) {
                events.on_paint_finish(&outline);
            }
        }

        if !self.active.is_empty() {
            frames.request_frame();
        }
    }

    /// Drop every active outline without completion callbacks (engine
    /// reset).
    pub fn clear(&mut self) {
        self.active.clear();
    }
}
