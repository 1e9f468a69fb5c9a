#![forbid(unsafe_code)]

//! Host adapter contracts.
//!
//! The engine is headless: it never walks a live host tree or queries layout
//! itself. A host adapter implements [`CommitTree`] over one committed
//! update cycle and [`LayoutHost`] for on-demand layout queries, and drives
//! the engine from its own commit notification and frame callbacks.

use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;

use crate::flags::NodeFlags;
use crate::geometry::{Measurement, RectF};
use crate::value::{PropMap, PropValue};

/// Identifier of one host renderer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RendererId(pub u32);

/// Stable identifier of a component type, assigned at allow-list
/// registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypeKey(pub u64);

/// Opaque reference to a visual target (the thing an outline is drawn
/// over). Stable for the lifetime of the underlying host node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TargetId(pub u64);

/// One context dependency of a node: the previous and next memoized values.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextDependency {
    /// Memoized value before the commit.
    pub previous: PropValue,
    /// Memoized value after the commit.
    pub next: PropValue,
}

/// One committed update cycle of the host tree.
///
/// All methods are read-only queries over an immutable snapshot; the engine
/// never mutates the host tree through this trait.
pub trait CommitTree {
    /// Node handle. Cheap to copy, hashable so the interceptor can track
    /// which nodes it already classified.
    type Node: Copy + Eq + Hash + Debug;

    /// Roots of the committed tree.
    fn roots(&self) -> Vec<Self::Node>;

    /// Children of `node`, in tree order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Parent of `node`, if any. Used by the allow-list ancestor walk.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Nodes the host explicitly marks as update sources for this commit.
    /// Empty when the host does not provide the triggered-updaters set.
    fn trigger_roots(&self) -> Vec<Self::Node>;

    /// Displayable component name, or `None` for unnameable types.
    fn display_name(&self, node: Self::Node) -> Option<&str>;

    /// Stable type identifier for allow-list lookups, or `None` when the
    /// type was never registered.
    fn type_key(&self, node: Self::Node) -> Option<TypeKey>;

    /// Host-reported status flags.
    fn flags(&self, node: Self::Node) -> NodeFlags;

    /// Self time of this node's render, in milliseconds.
    fn self_time_ms(&self, node: Self::Node) -> f64;

    /// Props before the commit. `None` on first mount.
    fn previous_props(&self, node: Self::Node) -> Option<&PropMap>;

    /// Props after the commit.
    fn next_props(&self, node: Self::Node) -> Option<&PropMap>;

    /// Context dependency list, or `None` when the node uses no context.
    /// `Some(&[])` is legal and distinct: context used, list empty.
    fn context_dependencies(&self, node: Self::Node) -> Option<&[ContextDependency]>;

    /// Visual target an outline for `node` should track.
    fn target(&self, node: Self::Node) -> TargetId;
}

/// Raw layout answer from the host, before the resolver's filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetLayout {
    /// Where the target sits.
    pub measurement: Measurement,
    /// Whether the host considers the target visible at all (not hidden or
    /// detached).
    pub visible: bool,
}

/// Layout query capability.
pub trait LayoutHost {
    /// Current layout of a target, or `None` when the target is gone.
    fn layout_of(&self, target: TargetId) -> Option<TargetLayout>;

    /// Current viewport in page space; used for off-screen filtering.
    fn viewport(&self) -> RectF;
}
