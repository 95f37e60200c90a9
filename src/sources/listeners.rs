use crate::prelude::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Registration token returned by `add_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener registry shared between a source and the threads it delivers on.
///
/// Delivery iterates over a snapshot, so listeners may register or unregister
/// from inside a callback.
pub struct ListenerSet<L: ?Sized> {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, Arc<L>)>>,
}

impl<L: ?Sized> ListenerSet<L> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Register `listener`. Returns its id and whether it is the first one.
    pub fn add(&self, listener: Arc<L>) -> (ListenerId, bool) {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        match self.listeners.lock() {
            Ok(mut listeners) => {
                listeners.push((id, listener));
                (id, listeners.len() == 1)
            }
            Err(_) => {
                log::warn!("listener registry poisoned, dropping registration");
                (id, false)
            }
        }
    }

    /// Unregister `id`. Returns whether it was registered and the set is now empty.
    pub fn remove(&self, id: ListenerId) -> (bool, bool) {
        match self.listeners.lock() {
            Ok(mut listeners) => {
                let before = listeners.len();
                listeners.retain(|(existing, _)| *existing != id);
                let removed = listeners.len() != before;
                (removed, removed && listeners.is_empty())
            }
            Err(_) => (false, false),
        }
    }

    pub fn snapshot(&self) -> Vec<Arc<L>> {
        self.listeners
            .lock()
            .map(|listeners| listeners.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L: ?Sized> Default for ListenerSet<L> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_last_listener_reported() {
        let set: ListenerSet<dyn Fn() + Send + Sync> = ListenerSet::new();
        let (a, first) = set.add(Arc::new(|| {}));
        assert!(first);
        let (b, first) = set.add(Arc::new(|| {}));
        assert!(!first);
        assert_ne!(a, b);

        assert_eq!(set.remove(a), (true, false));
        assert_eq!(set.remove(a), (false, false));
        assert_eq!(set.remove(b), (true, true));
        assert!(set.is_empty());
    }
}
