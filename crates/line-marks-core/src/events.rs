/// Change notifications fired by the bookmark store.
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What changed in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkEvent {
    /// Bookmarks were added or removed by a toggle.
    Toggled { path: PathBuf },
    /// Bookmarks were removed explicitly.
    Removed { path: PathBuf },
    /// A document edit moved or dropped bookmarks.
    Reconciled { path: PathBuf },
    /// A note was set or deleted.
    NoteChanged { path: PathBuf, line: usize },
    /// Every bookmark of one file was removed.
    FileCleared { path: PathBuf },
    /// Every bookmark of every file was removed.
    AllCleared,
    /// The store was replaced from persisted state.
    Loaded,
}

/// Handle returned by `subscribe`; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[must_use = "dropping the handle makes the listener impossible to remove"]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&MarkEvent)>;

/// Registered listeners, called in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> Subscription {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        self.listeners.insert(id, listener);
        Subscription(id)
    }

    pub(crate) fn remove(&mut self, subscription: Subscription) -> bool {
        self.listeners.remove(&subscription.0).is_some()
    }

    pub(crate) fn emit(&mut self, event: &MarkEvent) {
        for listener in self.listeners.values_mut() {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}
