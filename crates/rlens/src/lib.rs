#![forbid(unsafe_code)]

//! RenderLens public facade crate.
//!
//! One [`Engine`] object owns all engine state — no globals. The host
//! adapter constructs it with its layout, surface, and frame-scheduling
//! capabilities, then drives it from exactly two entry points on the host's
//! cooperative thread:
//!
//! - [`Engine::on_commit`] from the host's commit notification, and
//! - [`Engine::on_frame`] from the platform's visual-refresh callback,
//!   whenever the engine has asked for one via the frame scheduler.
//!
//! The engine reacts to and decorates commits; it never modifies or blocks
//! the host's reconciliation, and its commit path never raises.

use rlens_core::config::{HostMode, Options};
use rlens_core::host::{CommitTree, LayoutHost, RendererId, TargetId, TypeKey};
use rlens_core::store::{Store, SubId};
use rlens_core::time::Instant;
use rlens_detect::{AllowList, CommitConsumer, Render, ReportMap, TrackOptions, scan_commit};
use rlens_overlay::{
    FrameScheduler, GeometryResolver, NoopPaintEvents, OutlineAnimator, OutlineScheduler,
    OutlineSurface, PaintEvents,
};

// --- Core re-exports -------------------------------------------------------

pub use rlens_core::color::Rgb;
pub use rlens_core::config;
pub use rlens_core::flags::NodeFlags;
pub use rlens_core::geometry::{LayoutBox, Measurement, RectF, RegionKey};
pub use rlens_core::hook::{CommitHandler, CommitHookSlot};
pub use rlens_core::host::{ContextDependency, TargetLayout};
pub use rlens_core::value::{ElementId, PropMap, PropValue, RefId};

// --- Detect re-exports -----------------------------------------------------

pub use rlens_detect::{
    Change, ChangeList, ComponentReport, RenderKind, detect_context_change, detect_props_change,
};

// --- Overlay re-exports ----------------------------------------------------

pub use rlens_overlay::{ActiveOutline, PendingOutline, TextMetrics};

/// The re-render highlighting engine.
pub struct Engine {
    options: Options,
    host_mode: HostMode,
    paused: Store<bool>,
    allowlist: AllowList,
    report: ReportMap,
    resolver: GeometryResolver,
    scheduler: OutlineScheduler,
    animator: OutlineAnimator,
    layout: Box<dyn LayoutHost>,
    surface: Box<dyn OutlineSurface>,
    frames: Box<dyn FrameScheduler>,
    paint_events: Box<dyn PaintEvents>,
}

impl Engine {
    /// Create an engine wired to the host's capabilities.
    pub fn new(
        options: Options,
        host_mode: HostMode,
        layout: Box<dyn LayoutHost>,
        surface: Box<dyn OutlineSurface>,
        frames: Box<dyn FrameScheduler>,
    ) -> Self {
        Self {
            options,
            host_mode,
            paused: Store::new(false),
            allowlist: AllowList::new(),
            report: ReportMap::new(),
            resolver: GeometryResolver::new(),
            scheduler: OutlineScheduler::new(),
            animator: OutlineAnimator::new(),
            layout,
            surface,
            frames,
            paint_events: Box::new(NoopPaintEvents),
        }
    }

    /// Replace the paint lifecycle listener (builder).
    #[must_use]
    pub fn with_paint_events(mut self, events: Box<dyn PaintEvents>) -> Self {
        self.paint_events = events;
        self
    }

    /// Active configuration.
    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    // --- Commit entry point ------------------------------------------------

    /// Classify one committed tree and queue outlines for its renders.
    ///
    /// Safe to install into a [`CommitHookSlot`] chain: failures inside the
    /// scan are contained and logged, never raised to the host.
    pub fn on_commit<T: CommitTree>(&mut self, renderer: RendererId, tree: &T, now: Instant) {
        if !self.options.active_for(self.host_mode) || *self.paused.get() {
            return;
        }
        tracing::trace!(renderer = renderer.0, "commit received");

        let mut consumer = EngineConsumer {
            options: &self.options,
            report: &mut self.report,
            scheduler: &mut self.scheduler,
            resolver: &mut self.resolver,
            layout: &*self.layout,
            now,
            queued: false,
        };
        scan_commit(tree, &self.allowlist, &mut consumer);

        if consumer.queued {
            self.frames.request_frame();
        }
    }

    // --- Frame entry point -------------------------------------------------

    /// Run one visual-refresh tick: advance the flush protocol, then
    /// animate and draw the active outlines.
    pub fn on_frame(&mut self, now: Instant) {
        self.scheduler.flush(
            &mut self.resolver,
            &*self.layout,
            &mut self.animator,
            &mut *self.frames,
            &mut *self.paint_events,
            now,
        );
        self.animator.tick(
            &self.options,
            &mut self.resolver,
            &*self.layout,
            &mut *self.surface,
            &mut *self.frames,
            &mut *self.paint_events,
            now,
        );
    }

    // --- Pause / resume ----------------------------------------------------

    /// Stop classifying new commits. In-flight fades run to completion;
    /// there is no cancellation primitive for them.
    pub fn pause(&mut self) {
        self.paused.set(true);
    }

    /// Resume classifying commits.
    pub fn resume(&mut self) {
        self.paused.set(false);
    }

    /// Whether commit classification is paused.
    pub fn is_paused(&self) -> bool {
        *self.paused.get()
    }

    /// Observe pause state changes (e.g. for toolbar chrome).
    pub fn subscribe_paused(&mut self, listener: impl FnMut(&bool) + 'static) -> SubId {
        self.paused.subscribe(listener)
    }

    /// Stop observing pause state changes.
    pub fn unsubscribe_paused(&mut self, id: SubId) -> bool {
        self.paused.unsubscribe(id)
    }

    // --- Allow-list --------------------------------------------------------

    /// Restrict emission to `key` (and, per `options`, its descendants).
    pub fn register(&mut self, key: TypeKey, options: TrackOptions) {
        self.allowlist.register(key, options);
    }

    /// Registration options derived from the engine configuration.
    #[must_use]
    pub fn default_track_options(&self) -> TrackOptions {
        TrackOptions {
            include_children: self.options.include_children,
        }
    }

    /// Look up a registration.
    pub fn lookup(&self, key: TypeKey) -> Option<TrackOptions> {
        self.allowlist.lookup(key)
    }

    /// Replace the whole allow-list table.
    pub fn replace_allowlist(
        &mut self,
        entries: impl IntoIterator<Item = (TypeKey, TrackOptions)>,
    ) {
        self.allowlist.replace(entries);
    }

    // --- Report ------------------------------------------------------------

    /// The aggregate render report. Appended to on every render event;
    /// never reset automatically.
    #[inline]
    pub fn report(&self) -> &ReportMap {
        &self.report
    }

    // --- Lifecycle ---------------------------------------------------------

    /// Tear the engine state down: pending and active outlines, the
    /// geometry cache, the allow-list, the report, and pause state all
    /// clear, so no stale target reference survives an engine restart.
    pub fn reset(&mut self) {
        self.scheduler.clear();
        self.animator.clear();
        self.resolver.clear();
        self.allowlist.clear();
        self.report.clear();
        self.paused.set(false);
        self.surface.clear();
    }
}

/// Per-commit consumer: records the report, logs when asked to, and feeds
/// the outline scheduler.
struct EngineConsumer<'a> {
    options: &'a Options,
    report: &'a mut ReportMap,
    scheduler: &'a mut OutlineScheduler,
    resolver: &'a mut GeometryResolver,
    layout: &'a dyn LayoutHost,
    now: Instant,
    queued: bool,
}

impl CommitConsumer for EngineConsumer<'_> {
    fn on_commit_start(&mut self) {
        tracing::trace!("commit scan start");
    }

    fn on_render(&mut self, target: TargetId, render: Render) {
        if self.options.log {
            tracing::debug!(
                component = render.component_name.as_deref().unwrap_or("?"),
                kind = ?render.kind,
                changes = render.changes.as_ref().map_or(0, |c| c.len()),
                "render"
            );
        }
        self.report.record(&render);
        if self
            .scheduler
            .on_render(self.resolver, self.layout, target, render, self.now)
        {
            self.queued = true;
        }
    }

    fn on_commit_finish(&mut self) {
        tracing::trace!("commit scan finish");
    }
}

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    //! Everything a host adapter typically needs.
    pub use crate::{
        ActiveOutline, Change, CommitHookSlot, ContextDependency, Engine, Measurement, NodeFlags,
        PropMap, PropValue, RectF, RegionKey, RenderKind, TargetLayout, TextMetrics,
    };
    pub use rlens_core::config::{HostMode, Options};
    pub use rlens_core::host::{CommitTree, LayoutHost, RendererId, TargetId, TypeKey};
    pub use rlens_core::time::{Duration, Instant};
    pub use rlens_detect::{Render, TrackOptions};
    pub use rlens_overlay::{FrameScheduler, OutlineSurface, PaintEvents};
}
