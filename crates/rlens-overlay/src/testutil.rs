#![forbid(unsafe_code)]

//! Shared fakes for overlay tests.

use std::collections::HashMap;

use rlens_core::color::Rgb;
use rlens_core::geometry::{Measurement, RectF};
use rlens_core::host::{LayoutHost, TargetId, TargetLayout};
use rlens_detect::{Render, RenderKind};

use crate::outline::ActiveOutline;
use crate::surface::{FrameScheduler, OutlineSurface, PaintEvents, TextMetrics};

pub fn measurement_at(top: f64, left: f64, width: f64, height: f64) -> Measurement {
    Measurement::Region {
        rect: RectF::new(top, left, width, height),
    }
}

pub fn render_named(name: &str, occurrences: u32) -> Render {
    Render {
        kind: RenderKind::Props,
        component_name: Some(name.to_string()),
        self_time_ms: 1.0,
        occurrence_count: occurrences,
        is_trigger_source: false,
        uses_compiled_memoization: false,
        changes: None,
    }
}

/// Layout host backed by a hash map; counts queries per target.
#[derive(Default)]
pub struct FakeLayout {
    pub layouts: HashMap<TargetId, TargetLayout>,
    pub queries: std::cell::RefCell<HashMap<TargetId, u32>>,
    pub viewport: RectF,
}

impl FakeLayout {
    pub fn new() -> Self {
        Self {
            viewport: RectF::from_size(1000.0, 1000.0),
            ..Default::default()
        }
    }

    pub fn place(&mut self, target: TargetId, rect: RectF) {
        self.layouts.insert(target, TargetLayout {
            measurement: Measurement::Region { rect },
            visible: true,
        });
    }

    pub fn hide(&mut self, target: TargetId) {
        if let Some(layout) = self.layouts.get_mut(&target) {
            layout.visible = false;
        }
    }

    pub fn query_count(&self, target: TargetId) -> u32 {
        self.queries.borrow().get(&target).copied().unwrap_or(0)
    }
}

impl LayoutHost for FakeLayout {
    fn layout_of(&self, target: TargetId) -> Option<TargetLayout> {
        *self.queries.borrow_mut().entry(target).or_insert(0) += 1;
        self.layouts.get(&target).copied()
    }

    fn viewport(&self) -> RectF {
        self.viewport
    }
}

/// Records every surface call, in order.
#[derive(Debug, PartialEq, Clone)]
pub enum SurfaceCall {
    Clear,
    Path {
        rects: Vec<RectF>,
        color: Rgb,
        stroke_alpha: f32,
        fill_alpha: f32,
    },
    Label {
        text: String,
        background: RectF,
        alpha: f32,
    },
}

#[derive(Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_calls(&self) -> Vec<&SurfaceCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Path { .. }))
            .collect()
    }

    pub fn label_texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl OutlineSurface for RecordingSurface {
    fn clear(&mut self) {
        self.calls.push(SurfaceCall::Clear);
    }

    fn measure_text(&self, text: &str) -> TextMetrics {
        // 8x12 px monospace cell.
        TextMetrics {
            width: text.chars().count() as f64 * 8.0,
            height: 12.0,
        }
    }

    fn draw_outline_path(
        &mut self,
        rects: &[RectF],
        color: Rgb,
        stroke_alpha: f32,
        fill_alpha: f32,
    ) {
        self.calls.push(SurfaceCall::Path {
            rects: rects.to_vec(),
            color,
            stroke_alpha,
            fill_alpha,
        });
    }

    fn draw_label(&mut self, text: &str, background: RectF, _color: Rgb, alpha: f32) {
        self.calls.push(SurfaceCall::Label {
            text: text.to_string(),
            background,
            alpha,
        });
    }
}

/// Counts frame requests.
#[derive(Debug, Default)]
pub struct CountingFrames {
    pub requested: u32,
}

impl FrameScheduler for CountingFrames {
    fn request_frame(&mut self) {
        self.requested += 1;
    }
}

/// Records paint lifecycle notifications by outline id.
#[derive(Debug, Default)]
pub struct RecordingPaintEvents {
    pub started: Vec<String>,
    pub finished: Vec<String>,
}

impl PaintEvents for RecordingPaintEvents {
    fn on_paint_start(&mut self, outline: &ActiveOutline) {
        self.started.push(outline.id.clone());
    }

    fn on_paint_finish(&mut self, outline: &ActiveOutline) {
        self.finished.push(outline.id.clone());
    }
}
