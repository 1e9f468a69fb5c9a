#![forbid(unsafe_code)]

//! Per-node status flags reported by the host snapshot.

use bitflags::bitflags;

bitflags! {
    /// Host-reported status of a committed tree node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// The host confirms this node actually rendered during the commit.
        const RENDERED = 1 << 0;
        /// The node's updates are auto-memoized by a build-time compiler.
        /// Surfaced for label decoration only.
        const COMPILED_MEMO = 1 << 1;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::empty()
    }
}
