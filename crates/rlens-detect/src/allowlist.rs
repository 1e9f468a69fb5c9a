#![forbid(unsafe_code)]

//! Allow-list side table.
//!
//! Keyed by the stable [`TypeKey`] a component type receives at
//! registration time, never by collector-managed identity. Entries are
//! cleared explicitly on engine reset. There is no per-entry removal; the
//! table only supports full replacement, matching the registration API it
//! backs.

use std::collections::HashMap;

use rlens_core::host::TypeKey;

/// Options attached to one allow-list registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackOptions {
    /// Also emit renders of descendants of the registered type.
    pub include_children: bool,
}

/// Component types the scanner is restricted to. An empty list means no
/// restriction: every classified node is emitted.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    entries: HashMap<TypeKey, TrackOptions>,
}

impl AllowList {
    /// Create an empty (unrestricting) allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no type is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a component type. Registering the same key again replaces
    /// its options.
    pub fn register(&mut self, key: TypeKey, options: TrackOptions) {
        self.entries.insert(key, options);
    }

    /// Look up a registration.
    #[inline]
    pub fn lookup(&self, key: TypeKey) -> Option<TrackOptions> {
        self.entries.get(&key).copied()
    }

    /// Replace the whole table.
    pub fn replace(&mut self, entries: impl IntoIterator<Item = (TypeKey, TrackOptions)>) {
        self.entries = entries.into_iter().collect();
    }

    /// Drop every registration (engine reset).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
