#![forbid(unsafe_code)]

//! Listener registry and paired subscriptions.
//!
//! # Invariants
//!
//! 1. Listeners of one kind run in registration order.
//! 2. A [`ListenerId`] is never reused within a registry.
//! 3. A [`Subscription`] removes exactly the listeners it installed, once:
//!    either through [`Subscription::cancel`] or on drop.
//! 4. Removing an id that is not registered is a no-op.

use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use formgroup_core::{ControlEvent, ControlEventKind};

use crate::control::WeakControl;

/// A listener callback. Shared so dispatch can run it without holding a
/// borrow on the registry.
pub type Listener = Rc<dyn Fn(&mut ControlEvent)>;

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Listeners of one control, grouped by event kind.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    entries: AHashMap<ControlEventKind, Vec<(ListenerId, Listener)>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<_> = self
            .entries
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        counts.sort();
        f.debug_struct("ListenerRegistry")
            .field("next_id", &self.next_id)
            .field("counts", &counts)
            .finish()
    }
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `kind`.
    pub fn add(&mut self, kind: ControlEventKind, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.entry(kind).or_default().push((id, listener));
        tracing::trace!(message = "listener.add", kind = kind.as_str(), id = id.0);
        id
    }

    /// Remove the listener `id` registered for `kind`. Returns whether it
    /// was present.
    pub fn remove(&mut self, kind: ControlEventKind, id: ListenerId) -> bool {
        let Some(list) = self.entries.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(entry, _)| *entry != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.entries.remove(&kind);
        }
        tracing::trace!(
            message = "listener.remove",
            kind = kind.as_str(),
            id = id.0,
            removed
        );
        removed
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn count(&self, kind: ControlEventKind) -> usize {
        self.entries.get(&kind).map_or(0, Vec::len)
    }

    /// Number of listeners across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Listeners for `kind`, in registration order.
    #[must_use]
    pub fn snapshot(&self, kind: ControlEventKind) -> Vec<Listener> {
        self.entries
            .get(&kind)
            .map(|list| list.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default()
    }
}

/// Capability returned when a set of listeners is installed on a control.
///
/// Holding it keeps the listeners installed; cancelling or dropping it
/// removes exactly that set. It holds the control weakly, so a control
/// that is already gone is not kept alive and cancellation becomes a no-op.
#[must_use = "dropping a Subscription removes its listeners immediately"]
pub struct Subscription {
    control: WeakControl,
    entries: Vec<(ControlEventKind, ListenerId)>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("entries", &self.entries)
            .finish()
    }
}

impl Subscription {
    pub(crate) fn new(control: WeakControl, entries: Vec<(ControlEventKind, ListenerId)>) -> Self {
        Self { control, entries }
    }

    /// The `(kind, id)` pairs this subscription owns.
    #[must_use]
    pub fn entries(&self) -> &[(ControlEventKind, ListenerId)] {
        &self.entries
    }

    /// Number of listeners owned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove the installed listeners. Returns how many were still present.
    pub fn cancel(mut self) -> usize {
        self.release()
    }

    fn release(&mut self) -> usize {
        let entries = std::mem::take(&mut self.entries);
        let Some(control) = self.control.upgrade() else {
            return 0;
        };
        entries
            .into_iter()
            .filter(|(kind, id)| control.remove_listener(*kind, *id))
            .count()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
