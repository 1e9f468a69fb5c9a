#![forbid(unsafe_code)]

//! Outline scheduling: the two-phase flush window.
//!
//! Host commits can notify slightly out of order relative to paint, so two
//! render events for the same region inside one visual frame would produce
//! duplicate outlines if painted eagerly. Instead, queued outlines are
//! *staged* on one tick and painted on the next, so the second tick absorbs
//! anything queued while the first was in flight; staged and late outlines
//! are then merged by region key.
//!
//! The original recursive self-scheduling flush is reshaped into an
//! explicit work queue drained by scheduler ticks with a bounded number of
//! passes per tick. The painted-key set is threaded through the chain — a
//! region key painted once in a chain is skipped if it shows up again — and
//! a pass that observes an empty queue ends the chain and resets the set.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

use rlens_core::geometry::RegionKey;
use rlens_core::host::{LayoutHost, TargetId};
use rlens_core::time::Instant;
use rlens_detect::Render;

use crate::animator::OutlineAnimator;
use crate::outline::PendingOutline;
use crate::resolve::GeometryResolver;
use crate::surface::{FrameScheduler, PaintEvents};

/// Merge passes one tick may run before deferring to the next tick.
pub const MAX_FLUSH_PASSES: usize = 8;

/// Owns the pending-outline buffers and drives the flush protocol.
#[derive(Debug, Default)]
pub struct OutlineScheduler {
    /// Renders queued since the last staging, keyed by target.
    pending: BTreeMap<TargetId, PendingOutline>,
    /// Phase-1 batch waiting one tick for stragglers.
    staged: Vec<PendingOutline>,
    /// Region keys painted within the current flush chain.
    painted: HashSet<RegionKey>,
}

impl OutlineScheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one render event. Returns `false` when the target failed
    /// resolution and the event was dropped (a normal outcome).
    pub fn on_render(
        &mut self,
        resolver: &mut GeometryResolver,
        host: &dyn LayoutHost,
        target: TargetId,
        render: Render,
        now: Instant,
    ) -> bool {
        let Some(measurement) = resolver.measure(host, target, now) else {
            tracing::trace!(?target, "render event dropped: target not outlineable");
            return false;
        };
        match self.pending.entry(target) {
            Entry::Occupied(mut entry) => {
                let outline = entry.get_mut();
                outline.latest_measurement = measurement;
                outline.push(render);
            }
            Entry::Vacant(entry) => {
                entry.insert(PendingOutline::new(target, measurement, render));
            }
        }
        true
    }

    /// Whether a tick is needed to make progress.
    #[inline]
    pub fn has_work(&self) -> bool {
        !self.pending.is_empty() || !self.staged.is_empty()
    }

    /// Run one scheduler tick of the flush protocol.
    pub fn flush(
        &mut self,
        resolver: &mut GeometryResolver,
        host: &dyn LayoutHost,
        animator: &mut OutlineAnimator,
        frames: &mut dyn FrameScheduler,
        events: &mut dyn PaintEvents,
        now: Instant,
    ) {
        let span = tracing::debug_span!("flush_outlines");
        let _guard = span.enter();

        let mut passes = 0;
        loop {
            passes += 1;
            if passes > MAX_FLUSH_PASSES {
                // Defer the rest to the next tick rather than looping
                // unbounded on paint callbacks that keep queueing work.
                frames.request_frame();
                return;
            }

            if !self.staged.is_empty() {
                // Phase 2: absorb outlines queued since staging, merge by
                // region key, paint.
                let staged = std::mem::take(&mut self.staged);
                let late = self.drain_pending(resolver, host, now);
                let mut painted = 0usize;
                for outline in merge_by_region(staged.into_iter().chain(late)) {
                    let key = outline.region_key();
                    if !self.painted.insert(key) {
                        // Already painted within this flush chain.
                        continue;
                    }
                    animator.ingest(outline, key, now, events);
                    painted += 1;
                }
                tracing::trace!(painted, "flush pass painted");
                continue;
            }

            if self.pending.is_empty() {
                // A pass observing an empty queue ends the chain.
                self.painted.clear();
                return;
            }

            // Phase 1: stage the whole queue; one more tick absorbs events
            // that land while this frame is in flight.
            self.staged = self.drain_pending(resolver, host, now);
            if self.staged.is_empty() {
                // Every queued target failed resolution; check the queue
                // again before ending the chain.
                continue;
            }
            animator.refresh_geometry(resolver, host, now);
            frames.request_frame();
            return;
        }
    }

    /// Drop all buffered work and chain state (engine reset).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.staged.clear();
        self.painted.clear();
    }

    /// Take the queue, re-resolving each outline's geometry: targets may
    /// have moved (or vanished) between queueing and this tick.
    fn drain_pending(
        &mut self,
        resolver: &mut GeometryResolver,
        host: &dyn LayoutHost,
        now: Instant,
    ) -> Vec<PendingOutline> {
        let pending = std::mem::take(&mut self.pending);
        let mut resolved = Vec::with_capacity(pending.len());
        for (target, mut outline) in pending {
            if let Some(measurement) = resolver.measure(host, target, now) {
                outline.latest_measurement = measurement;
                resolved.push(outline);
            }
        }
        resolved
    }
}

/// Merge outlines sharing a region key: renders concatenate in arrival
/// order, the later measurement wins. First-arrival order is preserved.
fn merge_by_region(outlines: impl IntoIterator<Item = PendingOutline>) -> Vec<PendingOutline> {
    let mut merged: Vec<PendingOutline> = Vec::new();
    let mut index: BTreeMap<RegionKey, usize> = BTreeMap::new();
    for outline in outlines {
        match index.entry(outline.region_key()) {
            Entry::Occupied(entry) => merged[*entry.get()].absorb(outline),
            Entry::Vacant(entry) => {
                entry.insert(merged.len());
                merged.push(outline);
            }
        }
    }
    merged
}
