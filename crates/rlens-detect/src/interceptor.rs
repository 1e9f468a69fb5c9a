#![forbid(unsafe_code)]

//! Commit interception and per-node classification.
//!
//! One commit runs the state machine `start → (classify node)* → finish`.
//! Trigger roots are classified first (`is_trigger_source = true`), then the
//! full committed tree, skipping nodes already classified. The whole walk is
//! contained: a panic anywhere inside abandons the remaining classification
//! for this commit, is logged, and never reaches the host — but the consumer
//! still receives its finish hook so the `start → render* → finish` order
//! holds unconditionally.

use std::collections::HashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};

use rlens_core::flags::NodeFlags;
use rlens_core::host::{CommitTree, TargetId};

use crate::allowlist::AllowList;
use crate::change::{Render, RenderKind, detect_context_change, detect_props_change};

/// Hard cap on the allow-list ancestor walk. Deep enough for any real
/// component tree; guarantees termination if a host hands us corrupt parent
/// links.
const MAX_ANCESTOR_WALK: usize = 64;

/// Receiver of one commit's classification results, invoked in strict
/// order: `on_commit_start`, zero or more `on_render`, `on_commit_finish`.
pub trait CommitConsumer {
    /// A commit scan is starting.
    fn on_commit_start(&mut self);

    /// One classified render of one node.
    fn on_render(&mut self, target: TargetId, render: Render);

    /// The commit scan finished (also delivered after a contained failure).
    fn on_commit_finish(&mut self);
}

/// Scan one committed tree and emit classified renders to `consumer`.
pub fn scan_commit<T: CommitTree>(
    tree: &T,
    allowlist: &AllowList,
    consumer: &mut dyn CommitConsumer,
) {
    let span = tracing::debug_span!("scan_commit");
    let _guard = span.enter();

    consumer.on_commit_start();

    let walked = catch_unwind(AssertUnwindSafe(|| {
        let mut classified: HashSet<T::Node> = HashSet::new();

        for node in tree.trigger_roots() {
            if classified.insert(node) {
                classify_node(tree, node, true, allowlist, consumer);
            }
        }

        let mut stack = tree.roots();
        while let Some(node) = stack.pop() {
            if classified.insert(node) {
                classify_node(tree, node, false, allowlist, consumer);
            }
            stack.extend(tree.children(node));
        }
    }));

    if let Err(payload) = walked {
        tracing::error!(
            panic = %panic_message(payload.as_ref()),
            "commit scan failed; remaining classification abandoned"
        );
    }

    consumer.on_commit_finish();
}

fn classify_node<T: CommitTree>(
    tree: &T,
    node: T::Node,
    is_trigger_source: bool,
    allowlist: &AllowList,
    consumer: &mut dyn CommitConsumer,
) {
    let Some(name) = tree.display_name(node) else {
        return;
    };
    let flags = tree.flags(node);
    if !flags.contains(NodeFlags::RENDERED) {
        return;
    }

    let props_changes = match (tree.previous_props(node), tree.next_props(node)) {
        (Some(prev), Some(next)) => detect_props_change(prev, next),
        _ => Default::default(),
    };
    let context_changes = detect_context_change(tree.context_dependencies(node));

    let has_props = !props_changes.is_empty();
    let has_context = context_changes.as_ref().is_some_and(|c| !c.is_empty());
    if !has_props && !has_context {
        return;
    }
    if !allowed(tree, node, allowlist) {
        return;
    }

    let name = name.to_string();
    let target = tree.target(node);
    let self_time_ms = tree.self_time_ms(node);
    let compiled = flags.contains(NodeFlags::COMPILED_MEMO);

    // Props and context are distinct causal attributions: a node changing
    // both emits two events, never a merged one.
    if has_props {
        consumer.on_render(target, Render {
            kind: RenderKind::Props,
            component_name: Some(name.clone()),
            self_time_ms,
            occurrence_count: 1,
            is_trigger_source,
            uses_compiled_memoization: compiled,
            changes: Some(props_changes),
        });
    }
    if has_context {
        consumer.on_render(target, Render {
            kind: RenderKind::Context,
            component_name: Some(name),
            self_time_ms,
            occurrence_count: 1,
            is_trigger_source,
            uses_compiled_memoization: compiled,
            changes: context_changes,
        });
    }
}

/// Allow-list filter: with an empty list everything passes; otherwise the
/// node's own type must be registered, or an ancestor must be registered
/// with `include_children`. The upward walk stops at the first registered
/// ancestor either way.
fn allowed<T: CommitTree>(tree: &T, node: T::Node, allowlist: &AllowList) -> bool {
    if allowlist.is_empty() {
        return true;
    }
    if let Some(key) = tree.type_key(node) {
        if allowlist.lookup(key).is_some() {
            return true;
        }
    }

    let mut current = node;
    for _ in 0..MAX_ANCESTOR_WALK {
        let Some(parent) = tree.parent(current) else {
            return false;
        };
        if let Some(key) = tree.type_key(parent) {
            if let Some(options) = allowlist.lookup(key) {
                return options.include_children;
            }
        }
        current = parent;
    }
    false
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
