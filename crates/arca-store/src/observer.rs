//! # Change Listeners
//!
//! Registry of zero-argument callbacks invoked after every cart mutation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Notification Pass                                    │
//! │                                                                         │
//! │  mutation ──► registry.notify()                                         │
//! │                  │                                                      │
//! │                  ├─ clone listener list (lock held briefly)             │
//! │                  │                                                      │
//! │                  ├─ listener #1 ──► ok                                  │
//! │                  ├─ listener #2 ──► panics ──► caught, logged           │
//! │                  └─ listener #3 ──► ok   (still runs)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Listeners receive no arguments: they re-read the store snapshot
//! themselves. Invocation order is registration order.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::error;

/// A change listener.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Ordered set of listeners keyed by registration id.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Listener)>>,
}

impl ListenerRegistry {
    pub(crate) fn insert(&self, listener: Listener) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Invokes every listener once and returns how many ran.
    ///
    /// The list is cloned before invocation so listeners may subscribe or
    /// unsubscribe from inside a callback; such changes apply from the next
    /// pass on.
    pub(crate) fn notify(&self) -> usize {
        let listeners: Vec<(u64, Listener)> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for (id, listener) in &listeners {
            if catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
                error!(listener_id = id, "cart listener panicked; continuing with remaining listeners");
            }
        }
        listeners.len()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle returned by [`CartStore::subscribe`](crate::CartStore::subscribe).
///
/// Calling [`unsubscribe`](Self::unsubscribe) removes exactly the listener
/// this handle was created for. Dropping the handle without calling it keeps
/// the listener registered for the lifetime of the store.
#[derive(Debug)]
#[must_use = "keep the Subscription to be able to unsubscribe the listener later"]
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: &Arc<ListenerRegistry>) -> Self {
        Subscription {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    /// Removes the listener. Returns `false` if it was already gone (or the
    /// store was dropped).
    pub fn unsubscribe(self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.remove(self.id))
            .unwrap_or(false)
    }
}
