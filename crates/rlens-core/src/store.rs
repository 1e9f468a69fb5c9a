#![forbid(unsafe_code)]

//! Typed observer store.
//!
//! One value, a listener list, and value-equality gating on `set`. No
//! ambient interception of writes; subscribing hands back an explicit
//! handle that must be passed to [`Store::unsubscribe`].

/// Identifier of one subscription, used to deregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// A single observable value.
pub struct Store<T> {
    value: T,
    listeners: Vec<(SubId, Listener<T>)>,
    next_id: u64,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T: PartialEq> Store<T> {
    /// Create a store holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value, notifying listeners only when it actually changed.
    ///
    /// Returns `true` if listeners were notified.
    pub fn set(&mut self, next: T) -> bool {
        if self.value == next {
            return false;
        }
        self.value = next;
        for (_, listener) in &mut self.listeners {
            listener(&self.value);
        }
        true
    }

    /// Subscribe to changes. The listener is not invoked for the current
    /// value, only for subsequent changes.
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> SubId {
        let id = SubId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a subscription. Returns `false` if the handle was already
    /// unsubscribed.
    pub fn unsubscribe(&mut self, id: SubId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Number of live subscriptions.
    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
