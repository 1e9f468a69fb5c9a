#![forbid(unsafe_code)]

//! Commit-hook slot with chained installation.
//!
//! Hosts expose a single commit-notification slot. Installing the engine
//! must not displace whatever handler a devtools frontend (or another tool)
//! already put there, so the slot keeps a chain: every installed handler
//! runs, in installation order, and none of them may break the host's own
//! commit. A panicking handler is contained and logged.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::host::RendererId;

/// A commit notification handler.
pub type CommitHandler<T> = Box<dyn FnMut(RendererId, &T)>;

/// A single commit-notification slot holding a chain of handlers.
pub struct CommitHookSlot<T> {
    chain: Vec<CommitHandler<T>>,
}

impl<T> std::fmt::Debug for CommitHookSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitHookSlot")
            .field("handlers", &self.chain.len())
            .finish()
    }
}

impl<T> Default for CommitHookSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CommitHookSlot<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self { chain: Vec::new() }
    }

    /// Install a handler without displacing any pre-existing one.
    pub fn install(&mut self, handler: CommitHandler<T>) {
        self.chain.push(handler);
    }

    /// Number of installed handlers.
    #[inline]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Whether no handler is installed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Deliver a commit notification to every handler in installation
    /// order. Never raises to the caller: a panicking handler is contained
    /// and the remaining handlers still run.
    pub fn emit(&mut self, renderer: RendererId, tree: &T) {
        for handler in &mut self.chain {
            if catch_unwind(AssertUnwindSafe(|| handler(renderer, tree))).is_err() {
                crate::error!("commit handler panicked; continuing chain");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CommitHookSlot;
    use crate::host::RendererId;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn install_chains_rather_than_replacing() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut slot: CommitHookSlot<u32> = CommitHookSlot::new();

        let first = order.clone();
        slot.install(Box::new(move |_, tree| first.borrow_mut().push(("first", *tree))));
        let second = order.clone();
        slot.install(Box::new(move |_, tree| {
            second.borrow_mut().push(("second", *tree))
        }));

        slot.emit(RendererId(1), &7);
        assert_eq!(*order.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn panicking_handler_does_not_break_the_chain() {
        let reached = Rc::new(RefCell::new(false));
        let mut slot: CommitHookSlot<()> = CommitHookSlot::new();

        slot.install(Box::new(|_, _| panic!("bad handler")));
        let sink = reached.clone();
        slot.install(Box::new(move |_, _| *sink.borrow_mut() = true));

        slot.emit(RendererId(0), &());
        assert!(*reached.borrow());
    }
}
