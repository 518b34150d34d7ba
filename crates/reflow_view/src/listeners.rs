//! Registry of document listeners.

use log::trace;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Notified after a layout pass publishes a new tree.
pub trait DocumentListener: Send + Sync {
    fn document_loaded(&self);
}

/// Handle returned on registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(ListenerId, Arc<dyn DocumentListener>)>,
}

#[derive(Default)]
pub struct DocumentListeners {
    registry: Mutex<Registry>,
}

impl DocumentListeners {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, listener: Arc<dyn DocumentListener>) -> ListenerId {
        let mut registry = self.registry();
        let id = ListenerId(registry.next_id);
        registry.next_id = registry.next_id.wrapping_add(1);
        registry.entries.push((id, listener));
        id
    }

    /// Unregister a listener; returns whether it was registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut registry = self.registry();
        let before = registry.entries.len();
        registry.entries.retain(|(entry_id, _)| *entry_id != id);
        registry.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.registry().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notify the listeners registered at the time of the call.
    ///
    /// The registry lock is released before any listener runs, so listeners may
    /// register or unregister (themselves included) while being notified.
    pub fn notify_loaded(&self) {
        let snapshot: Vec<Arc<dyn DocumentListener>> = self
            .registry()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        trace!("Notifying {} document listeners", snapshot.len());
        for listener in snapshot {
            listener.document_loaded();
        }
    }
}
