#![forbid(unsafe_code)]

//! Aggregate render report.
//!
//! A mapping from component name to running totals plus the raw render
//! records, appended to on every render event. Queryable at any time and
//! never reset automatically; only an explicit engine reset clears it.

use std::collections::HashMap;

use serde::Serialize;

use crate::change::Render;

/// Name used for renders whose component could not be named. Classified
/// nodes always carry a name, so this only shows up if a host adapter
/// misbehaves.
const ANONYMOUS: &str = "(anonymous)";

/// Running totals for one component.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComponentReport {
    /// Total render occurrences.
    pub count: u64,
    /// Summed self time in milliseconds.
    pub total_time_ms: f64,
    /// Raw render records, in arrival order.
    pub renders: Vec<Render>,
}

/// The report table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportMap {
    entries: HashMap<String, ComponentReport>,
}

impl ReportMap {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one render event.
    pub fn record(&mut self, render: &Render) {
        let name = render
            .component_name
            .as_deref()
            .unwrap_or(ANONYMOUS)
            .to_string();
        let entry = self.entries.entry(name).or_default();
        entry.count += u64::from(render.occurrence_count);
        entry.total_time_ms += render.self_time_ms;
        entry.renders.push(render.clone());
    }

    /// Totals for one component, if it ever rendered.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&ComponentReport> {
        self.entries.get(name)
    }

    /// Iterate all components.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentReport)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct components seen.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries (engine reset).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
