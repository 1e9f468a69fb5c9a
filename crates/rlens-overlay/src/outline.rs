#![forbid(unsafe_code)]

//! Outline data model.
//!
//! A [`PendingOutline`] buffers renders for one target between a commit and
//! the next flush. Activation transfers ownership to the animator as an
//! [`ActiveOutline`], keyed by the region key its measurement had at that
//! moment; later renders landing on the same key merge into the active
//! outline and restart its fade.

use smallvec::SmallVec;

use rlens_core::color::Rgb;
use rlens_core::geometry::{Measurement, RegionKey};
use rlens_core::host::TargetId;
use rlens_core::time::{Duration, Instant};
use rlens_detect::Render;

/// Renders accumulated by one outline.
pub type RenderList = SmallVec<[Render; 4]>;

/// Buffered renders for one visual target, not yet painted.
#[derive(Debug, Clone)]
pub struct PendingOutline {
    /// The tracked visual target.
    pub target: TargetId,
    /// Most recent successful measurement of the target.
    pub latest_measurement: Measurement,
    /// Accumulated renders. Never empty once the outline exists.
    pub renders: RenderList,
}

impl PendingOutline {
    /// Create an outline holding its first render.
    pub fn new(target: TargetId, measurement: Measurement, render: Render) -> Self {
        let mut renders = RenderList::new();
        renders.push(render);
        Self {
            target,
            latest_measurement: measurement,
            renders,
        }
    }

    /// Append one more render.
    #[inline]
    pub fn push(&mut self, render: Render) {
        self.renders.push(render);
    }

    /// Merge another outline for the same region into this one. Renders
    /// are concatenated (never dropped); the measurement is taken from the
    /// later outline.
    pub fn absorb(&mut self, other: PendingOutline) {
        self.latest_measurement = other.latest_measurement;
        self.renders.extend(other.renders);
    }

    /// Merge/dedupe identity of this outline.
    #[inline]
    pub fn region_key(&self) -> RegionKey {
        self.latest_measurement.region_key()
    }

    /// Total render occurrences across all accumulated renders.
    pub fn total_occurrences(&self) -> u32 {
        self.renders
            .iter()
            .map(|r| r.occurrence_count)
            .fold(0, u32::saturating_add)
    }
}

/// One outline owned by the animator, fading over successive frames.
#[derive(Debug, Clone)]
pub struct ActiveOutline {
    /// The underlying outline data.
    pub outline: PendingOutline,
    /// Stable identifier, unique across one engine lifetime.
    pub id: String,
    /// Stroke alpha computed for the current frame, in `[0, 1]`.
    pub alpha: f32,
    /// Frames elapsed since activation or last merge.
    pub frame: u32,
    /// Fade length in frames; depends on the unstable classification.
    pub total_frames: u32,
    /// Interpolated outline color for the current frame.
    pub color: Rgb,
    /// Label text, present while the outline is classified unstable.
    pub text: Option<String>,
    /// Arrival time of the most recent render.
    pub updated_at: Instant,
}

impl ActiveOutline {
    /// Whether this outline keeps re-rendering: more than one accumulated
    /// render occurrence, the latest within the reset window.
    pub fn is_unstable(&self, now: Instant, reset_window: Duration) -> bool {
        self.outline.total_occurrences() > 1
            && now.saturating_duration_since(self.updated_at) < reset_window
    }

    /// Absorb a later outline for the same region key: renders are
    /// appended and the fade restarts from frame zero.
    pub fn merge(&mut self, incoming: PendingOutline, now: Instant) {
        self.outline.absorb(incoming);
        self.frame = 0;
        self.updated_at = now;
    }

    /// Whether the fade has run past its last frame.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.frame > self.total_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{measurement_at, render_named};

    #[test]
    fn absorb_concatenates_renders_and_takes_later_measurement() {
        let mut a = PendingOutline::new(
            TargetId(1),
            measurement_at(0.0, 0.0, 10.0, 10.0),
            render_named("A", 1),
        );
        let mut b = PendingOutline::new(
            TargetId(2),
            measurement_at(0.0, 0.0, 10.0, 10.0),
            render_named("B", 2),
        );
        b.push(render_named("C", 1));

        a.absorb(b);
        assert_eq!(a.renders.len(), 3);
        assert_eq!(a.total_occurrences(), 4);
        assert_eq!(a.latest_measurement, measurement_at(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn merge_resets_fade_and_refreshes_timestamp() {
        let t0 = Instant::now();
        let mut active = ActiveOutline {
            outline: PendingOutline::new(
                TargetId(1),
                measurement_at(0.0, 0.0, 10.0, 10.0),
                render_named("A", 1),
            ),
            id: "outline-0".into(),
            alpha: 0.1,
            frame: 4,
            total_frames: 5,
            color: Rgb::new(0, 0, 0),
            text: None,
            updated_at: t0,
        };

        let t1 = t0 + Duration::from_millis(100);
        active.merge(
            PendingOutline::new(
                TargetId(1),
                measurement_at(0.0, 0.0, 10.0, 10.0),
                render_named("A", 1),
            ),
            t1,
        );

        assert_eq!(active.frame, 0);
        assert_eq!(active.updated_at, t1);
        assert_eq!(active.outline.renders.len(), 2);
    }

    #[test]
    fn unstable_requires_repeats_within_the_window() {
        let t0 = Instant::now();
        let window = Duration::from_millis(5000);
        let mut active = ActiveOutline {
            outline: PendingOutline::new(
                TargetId(1),
                measurement_at(0.0, 0.0, 10.0, 10.0),
                render_named("A", 1),
            ),
            id: "outline-0".into(),
            alpha: 0.0,
            frame: 0,
            total_frames: 5,
            color: Rgb::new(0, 0, 0),
            text: None,
            updated_at: t0,
        };

        // One render: stable regardless of recency.
        assert!(!active.is_unstable(t0, window));

        // A second render within the window: unstable.
        active.merge(
            PendingOutline::new(
                TargetId(1),
                measurement_at(0.0, 0.0, 10.0, 10.0),
                render_named("A", 1),
            ),
            t0 + Duration::from_millis(10),
        );
        assert!(active.is_unstable(t0 + Duration::from_millis(20), window));

        // After a quiet period the streak no longer counts.
        assert!(!active.is_unstable(t0 + Duration::from_millis(6000), window));
    }

    #[test]
    fn expiry_is_strictly_past_total_frames() {
        let mut active = ActiveOutline {
            outline: PendingOutline::new(
                TargetId(1),
                measurement_at(0.0, 0.0, 10.0, 10.0),
                render_named("A", 1),
            ),
            id: "outline-0".into(),
            alpha: 0.0,
            frame: 5,
            total_frames: 5,
            color: Rgb::new(0, 0, 0),
            text: None,
            updated_at: Instant::now(),
        };
        assert!(!active.is_expired());
        active.frame = 6;
        assert!(active.is_expired());
    }
}
