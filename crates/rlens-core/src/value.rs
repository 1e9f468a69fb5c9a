#![forbid(unsafe_code)]

//! Prop and context value snapshots.
//!
//! The host adapter captures each prop or context value as a [`PropValue`]
//! carrying two things the diff rules need: a *reference identity* for
//! composite values and a *structural fingerprint* for unstable-value
//! classification. The engine never touches live host values.

use std::collections::BTreeMap;

use serde::Serialize;

/// Reference identity of a composite host value.
///
/// The host assigns one id per allocation; two snapshots of the same live
/// object share a `RefId`, a re-allocated clone gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RefId(pub u64);

/// Identity of a structural element of the host tree's own element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ElementId(pub u64);

/// Snapshot of a single prop or context value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropValue {
    /// Absent or null value.
    Null,
    /// Boolean primitive.
    Bool(bool),
    /// Integer primitive.
    Int(i64),
    /// Floating-point primitive.
    Float(f64),
    /// String primitive.
    Str(String),
    /// A structural element of the host tree (skipped by the differ: these
    /// churn every render by construction).
    Element(ElementId),
    /// Object-like composite with a structural snapshot of its fields.
    Object {
        /// Reference identity.
        id: RefId,
        /// Structural shape captured by the host adapter.
        shape: serde_json::Value,
    },
    /// Function-like composite fingerprinted by its source text.
    Func {
        /// Reference identity.
        id: RefId,
        /// Source text as seen by the host.
        source: String,
    },
}

impl PropValue {
    /// Identity equality: the "same value" test that suppresses a Change.
    ///
    /// Primitives compare by value (floats bitwise, so a NaN is identical to
    /// itself), elements by element id, composites by reference identity
    /// only. Structure is deliberately ignored here; see
    /// [`PropValue::fingerprint`].
    pub fn identity_eq(&self, other: &PropValue) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Element(a), Self::Element(b)) => a == b,
            (Self::Object { id: a, .. }, Self::Object { id: b, .. }) => a == b,
            (Self::Func { id: a, .. }, Self::Func { id: b, .. }) => a == b,
            _ => false,
        }
    }

    /// Whether this value is composite (object-like or function-like).
    ///
    /// Only composite values can be classified as unstable: a differing
    /// primitive is a real change, never a missed memoization.
    #[inline]
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object { .. } | Self::Func { .. })
    }

    /// Whether this value is a structural element of the host tree.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    /// Fast structural serialization used to detect re-allocated but
    /// semantically identical values.
    ///
    /// Returns `None` for primitives and elements, which are never
    /// fingerprinted.
    pub fn fingerprint(&self) -> Option<String> {
        match self {
            Self::Object { shape, .. } => serde_json::to_string(shape).ok(),
            Self::Func { source, .. } => Some(source.clone()),
            _ => None,
        }
    }
}

/// Props of one node, keyed by prop name.
///
/// A `BTreeMap` so that union-of-keys iteration (and therefore Change
/// ordering) is deterministic.
pub type PropMap = BTreeMap<String, PropValue>;
