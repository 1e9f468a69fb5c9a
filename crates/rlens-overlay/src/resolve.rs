#![forbid(unsafe_code)]

//! Geometry resolution with a short-lived per-target cache.
//!
//! Layout queries against the host can be expensive and bursts of renders
//! hit the same targets repeatedly, so each target's answer (including a
//! miss) is cached for one throttle interval. A resolution miss — hidden,
//! zero-size, off-viewport, or removed target — is a normal outcome, not an
//! error: the caller drops the event.

use std::collections::HashMap;

use rlens_core::geometry::{Measurement, RectF};
use rlens_core::host::{LayoutHost, TargetId, TargetLayout};
use rlens_core::time::{Duration, Instant};

/// How long one target's resolution stays valid.
pub const LAYOUT_THROTTLE: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    measured_at: Instant,
    measurement: Option<Measurement>,
}

/// Resolves targets to measurements, bounding host layout queries to at
/// most one per throttle interval per target.
#[derive(Debug, Default)]
pub struct GeometryResolver {
    cache: HashMap<TargetId, CacheEntry>,
}

impl GeometryResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `target` to its current measurement, or `None` when the
    /// target is currently not outlineable.
    pub fn measure(
        &mut self,
        host: &dyn LayoutHost,
        target: TargetId,
        now: Instant,
    ) -> Option<Measurement> {
        if let Some(entry) = self.cache.get(&target) {
            if now.saturating_duration_since(entry.measured_at) < LAYOUT_THROTTLE {
                return entry.measurement;
            }
        }

        let measurement = host
            .layout_of(target)
            .and_then(|layout| admit(layout, host.viewport()));
        self.cache.insert(target, CacheEntry {
            measured_at: now,
            measurement,
        });
        measurement
    }

    /// Number of cached targets.
    #[inline]
    pub fn cached_targets(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cache entry (engine reset). Stale target references must
    /// not survive an engine restart.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

/// Visibility filters: hidden, zero-size, and fully off-viewport targets
/// resolve to nothing.
fn admit(layout: TargetLayout, viewport: RectF) -> Option<Measurement> {
    if !layout.visible {
        return None;
    }
    let bounds = layout.measurement.bounds();
    if bounds.is_empty() {
        return None;
    }
    if !bounds.intersects(&viewport) {
        return None;
    }
    Some(layout.measurement)
}
