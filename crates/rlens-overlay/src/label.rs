#![forbid(unsafe_code)]

//! Outline label text.
//!
//! Accumulated renders are grouped by component name, counts summed and
//! flags OR-combined per group, groups sorted by summed count descending,
//! and rendered as `Name ×N` entries joined with spaces. The result is
//! bounded to [`MAX_LABEL_CHARS`] characters plus an ellipsis marker.

use std::collections::HashMap;

use rlens_detect::Render;

/// Longest label before truncation kicks in.
pub const MAX_LABEL_CHARS: usize = 20;

/// Truncation marker appended after a cut.
pub const ELLIPSIS: char = '…';

/// Prefix for components the host marked as update sources.
pub const TRIGGER_PREFIX: char = '⚡';

/// Suffix for components whose updates are compiler-memoized.
pub const MEMO_SUFFIX: char = '✨';

#[derive(Default)]
struct Group {
    count: u32,
    is_trigger_source: bool,
    uses_compiled_memoization: bool,
}

/// Build the label for an outline's accumulated renders.
///
/// Returns `None` when no render carries a component name.
pub fn label_text(renders: &[Render]) -> Option<String> {
    let mut groups: HashMap<&str, Group> = HashMap::new();
    for render in renders {
        let Some(name) = render.component_name.as_deref() else {
            continue;
        };
        let group = groups.entry(name).or_default();
        group.count = group.count.saturating_add(render.occurrence_count);
        group.is_trigger_source |= render.is_trigger_source;
        group.uses_compiled_memoization |= render.uses_compiled_memoization;
    }
    if groups.is_empty() {
        return None;
    }

    let mut groups: Vec<(&str, Group)> = groups.into_iter().collect();
    // Highest count first; name breaks ties so the label is deterministic.
    groups.sort_by(|(a_name, a), (b_name, b)| {
        b.count.cmp(&a.count).then_with(|| a_name.cmp(b_name))
    });

    let text = groups
        .iter()
        .map(|(name, group)| {
            let mut part = String::new();
            if group.is_trigger_source {
                part.push(TRIGGER_PREFIX);
            }
            part.push_str(name);
            if group.count > 1 {
                part.push_str(&format!(" ×{}", group.count));
            }
            if group.uses_compiled_memoization {
                part.push(MEMO_SUFFIX);
            }
            part
        })
        .collect::<Vec<_>>()
        .join(" ");

    Some(truncate(&text))
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_LABEL_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_LABEL_CHARS).collect();
    cut.push(ELLIPSIS);
    cut
}
