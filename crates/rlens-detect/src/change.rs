#![forbid(unsafe_code)]

//! Change detection between a node's previous and next values.
//!
//! # Algorithm
//!
//! Props: iterate the union of keys present on either side. A key is
//! skipped when the two values are identity-equal, when either side is a
//! structural element of the host tree (those churn every render by
//! construction and carry no signal), or when it is the conventional
//! `children` slot. Every surviving key yields one [`Change`].
//!
//! A change is classified `looks_unstable` iff both sides are composite
//! (object-like or function-like) and their structural fingerprints are
//! textually equal: the value is semantically identical but was
//! re-allocated, which points at a missed memoization rather than a real
//! behavioral change. Differing primitives are real changes and are never
//! marked unstable; equal primitives never get this far because identity
//! equality already excluded them.
//!
//! Context: the same identity/fingerprint rule over the node's context
//! dependency list. `None` in, `None` out — "no context used" stays
//! distinguishable from "context used, unchanged" (`Some` with no
//! changes).

use serde::Serialize;
use smallvec::SmallVec;

use rlens_core::host::ContextDependency;
use rlens_core::value::{PropMap, PropValue};

/// The conventional slot for nested tree content, excluded from prop diffs.
pub const CHILDREN_PROP: &str = "children";

/// What caused a render: changed props or changed context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderKind {
    /// Props diff produced changes.
    Props,
    /// A context dependency changed.
    Context,
}

/// One changed prop or context value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    /// Prop name; empty for context changes (context has no field name).
    pub name: String,
    /// Value before the commit.
    pub previous_value: PropValue,
    /// Value after the commit.
    pub next_value: PropValue,
    /// Semantically identical but re-allocated.
    pub looks_unstable: bool,
}

/// Change records for one diff pass. Most nodes change a handful of values.
pub type ChangeList = SmallVec<[Change; 4]>;

/// One classified render of one node in one commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Render {
    /// Causal attribution of this render.
    pub kind: RenderKind,
    /// Component name, when the type is nameable.
    pub component_name: Option<String>,
    /// Self time in milliseconds.
    pub self_time_ms: f64,
    /// Starts at 1; summed when renders for the same component name are
    /// aggregated for display.
    pub occurrence_count: u32,
    /// The host marked this node as an update source for the commit.
    pub is_trigger_source: bool,
    /// The component's updates are auto-memoized by a build-time compiler.
    pub uses_compiled_memoization: bool,
    /// Change records, or `None` when the producing pass recorded none.
    pub changes: Option<ChangeList>,
}

const ABSENT: PropValue = PropValue::Null;

/// Diff a node's previous props against its next props.
pub fn detect_props_change(previous: &PropMap, next: &PropMap) -> ChangeList {
    let mut changes = ChangeList::new();

    let mut keys: Vec<&str> = previous.keys().map(String::as_str).collect();
    for key in next.keys() {
        if !previous.contains_key(key) {
            keys.push(key);
        }
    }
    keys.sort_unstable();

    for key in keys {
        if key == CHILDREN_PROP {
            continue;
        }
        let prev = previous.get(key).unwrap_or(&ABSENT);
        let new = next.get(key).unwrap_or(&ABSENT);
        if prev.identity_eq(new) {
            continue;
        }
        if prev.is_element() || new.is_element() {
            continue;
        }
        changes.push(Change {
            name: key.to_string(),
            previous_value: prev.clone(),
            next_value: new.clone(),
            looks_unstable: looks_unstable(prev, new),
        });
    }

    changes
}

/// Diff a node's context dependency list.
///
/// Returns `None` when the node has no context dependencies.
pub fn detect_context_change(deps: Option<&[ContextDependency]>) -> Option<ChangeList> {
    let deps = deps?;
    let mut changes = ChangeList::new();

    for dep in deps {
        if dep.previous.identity_eq(&dep.next) {
            continue;
        }
        if dep.previous.is_element() || dep.next.is_element() {
            continue;
        }
        changes.push(Change {
            name: String::new(),
            previous_value: dep.previous.clone(),
            next_value: dep.next.clone(),
            looks_unstable: looks_unstable(&dep.previous, &dep.next),
        });
    }

    Some(changes)
}

fn looks_unstable(previous: &PropValue, next: &PropValue) -> bool {
    if !previous.is_composite() || !next.is_composite() {
        return false;
    }
    match (previous.fingerprint(), next.fingerprint()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rlens_core::value::{ElementId, RefId};
    use serde_json::json;

    fn props(entries: &[(&str, PropValue)]) -> PropMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn object(id: u64, shape: serde_json::Value) -> PropValue {
        PropValue::Object {
            id: RefId(id),
            shape,
        }
    }

    fn func(id: u64, source: &str) -> PropValue {
        PropValue::Func {
            id: RefId(id),
            source: source.to_string(),
        }
    }

    // --- Skip rules ---

    #[test]
    fn identical_primitive_yields_no_change() {
        let prev = props(&[("x", PropValue::Int(1))]);
        let next = props(&[("x", PropValue::Int(1))]);
        assert!(detect_props_change(&prev, &next).is_empty());
    }

    #[test]
    fn same_reference_composite_yields_no_change() {
        let prev = props(&[("style", object(7, json!({"w": 1})))]);
        let next = props(&[("style", object(7, json!({"w": 2})))]);
        assert!(detect_props_change(&prev, &next).is_empty());
    }

    #[test]
    fn elements_are_skipped_on_either_side() {
        let prev = props(&[("icon", PropValue::Element(ElementId(1)))]);
        let next = props(&[("icon", PropValue::Element(ElementId(2)))]);
        assert!(detect_props_change(&prev, &next).is_empty());

        let prev = props(&[("icon", PropValue::Element(ElementId(1)))]);
        let next = props(&[("icon", PropValue::Int(3))]);
        assert!(detect_props_change(&prev, &next).is_empty());
    }

    #[test]
    fn children_slot_is_skipped() {
        let prev = props(&[(CHILDREN_PROP, PropValue::Int(1))]);
        let next = props(&[(CHILDREN_PROP, PropValue::Int(2))]);
        assert!(detect_props_change(&prev, &next).is_empty());
    }

    // --- Real changes ---

    #[test]
    fn differing_primitive_is_a_stable_change() {
        let prev = props(&[("count", PropValue::Int(1))]);
        let next = props(&[("count", PropValue::Int(2))]);
        let changes = detect_props_change(&prev, &next);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].name, "count");
        assert!(!changes[0].looks_unstable);
    }

    #[test]
    fn added_and_removed_keys_are_changes() {
        let prev = props(&[("a", PropValue::Int(1))]);
        let next = props(&[("b", PropValue::Int(2))]);
        let changes = detect_props_change(&prev, &next);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].name, "a");
        assert_eq!(changes[0].next_value, PropValue::Null);
        assert_eq!(changes[1].name, "b");
        assert_eq!(changes[1].previous_value, PropValue::Null);
    }

    #[test]
    fn change_order_is_deterministic() {
        let prev = props(&[("z", PropValue::Int(1)), ("a", PropValue::Int(1))]);
        let next = props(&[("z", PropValue::Int(2)), ("a", PropValue::Int(2))]);
        let names: Vec<_> = detect_props_change(&prev, &next)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["a", "z"]);
    }

    // --- Unstable classification ---

    #[test]
    fn reallocated_identical_object_is_unstable() {
        let prev = props(&[("style", object(1, json!({"w": 1, "h": 2})))]);
        let next = props(&[("style", object(2, json!({"w": 1, "h": 2})))]);
        let changes = detect_props_change(&prev, &next);
        assert_eq!(changes.len(), 1);
        assert!(changes[0].looks_unstable);
    }

    #[test]
    fn reallocated_identical_closure_is_unstable() {
        let prev = props(&[("cb", func(1, "() => setCount(count + 1)"))]);
        let next = props(&[("cb", func(2, "() => setCount(count + 1)"))]);
        let changes = detect_props_change(&prev, &next);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].name, "cb");
        assert!(changes[0].looks_unstable);
    }

    #[test]
    fn structurally_different_composites_are_stable_changes() {
        let prev = props(&[("style", object(1, json!({"w": 1})))]);
        let next = props(&[("style", object(2, json!({"w": 2})))]);
        let changes = detect_props_change(&prev, &next);
        assert_eq!(changes.len(), 1);
        assert!(!changes[0].looks_unstable);
    }

    #[test]
    fn composite_replaced_by_primitive_is_stable() {
        let prev = props(&[("value", object(1, json!({})))]);
        let next = props(&[("value", PropValue::Int(1))]);
        let changes = detect_props_change(&prev, &next);
        assert_eq!(changes.len(), 1);
        assert!(!changes[0].looks_unstable);
    }

    // --- Context ---

    #[test]
    fn no_context_dependencies_is_none() {
        assert_eq!(detect_context_change(None), None);
    }

    #[test]
    fn unchanged_context_is_some_empty() {
        let deps = [ContextDependency {
            previous: PropValue::Int(1),
            next: PropValue::Int(1),
        }];
        let changes = detect_context_change(Some(&deps)).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn context_changes_have_empty_names() {
        let deps = [
            ContextDependency {
                previous: PropValue::Int(1),
                next: PropValue::Int(2),
            },
            ContextDependency {
                previous: object(1, json!({"t": "dark"})),
                next: object(2, json!({"t": "dark"})),
            },
        ];
        let changes = detect_context_change(Some(&deps)).unwrap();
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.name.is_empty()));
        assert!(!changes[0].looks_unstable);
        assert!(changes[1].looks_unstable);
    }

    // --- Properties ---

    fn primitive_value() -> impl Strategy<Value = PropValue> {
        prop_oneof![
            Just(PropValue::Null),
            any::<bool>().prop_map(PropValue::Bool),
            any::<i64>().prop_map(PropValue::Int),
            "[a-z]{0,8}".prop_map(PropValue::Str),
        ]
    }

    proptest! {
        #[test]
        fn identity_equal_pairs_produce_no_change(value in primitive_value(), key in "[a-z]{1,6}") {
            let prev = props(&[(key.as_str(), value.clone())]);
            let next = props(&[(key.as_str(), value)]);
            prop_assert!(detect_props_change(&prev, &next).is_empty());
        }

        #[test]
        fn differing_primitives_are_never_unstable(a in any::<i64>(), b in any::<i64>()) {
            prop_assume!(a != b);
            let prev = props(&[("n", PropValue::Int(a))]);
            let next = props(&[("n", PropValue::Int(b))]);
            let changes = detect_props_change(&prev, &next);
            prop_assert_eq!(changes.len(), 1);
            prop_assert!(!changes[0].looks_unstable);
        }

        #[test]
        fn equal_fingerprints_under_fresh_refs_are_unstable(source in "[ -~]{0,24}") {
            let prev = props(&[("cb", func(1, &source))]);
            let next = props(&[("cb", func(2, &source))]);
            let changes = detect_props_change(&prev, &next);
            prop_assert_eq!(changes.len(), 1);
            prop_assert!(changes[0].looks_unstable);
        }
    }
}
