//! Listener registry and broadcast support
//!
//! [`Hub`] is the fan-out primitive behind session observers, live prompt
//! queries and user notices. Listeners are identified by a [`ListenerId`]
//! and removed either explicitly or when their receiver is dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::errors::{DeckError, Result};

/// Listener ID type
pub type ListenerId = u64;

/// Global listener ID counter
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Registry of listeners that receive values of type `T`
pub struct Hub<T> {
    listeners: Arc<Mutex<HashMap<ListenerId, UnboundedSender<T>>>>,
}

impl<T> Clone for Hub<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl<T: Clone> Hub<T> {
    /// Create a new hub
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Generate a unique listener ID
    pub fn next_listener_id() -> ListenerId {
        NEXT_LISTENER_ID.fetch_add(1, Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ListenerId, UnboundedSender<T>>> {
        // A panicking listener never leaves the map half-updated.
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a new listener with its sender
    pub fn register(&self, id: ListenerId, sender: UnboundedSender<T>) {
        self.lock().insert(id, sender);
    }

    /// Create a channel, register its sender and hand back the receiver
    pub fn attach(&self) -> (ListenerId, UnboundedReceiver<T>) {
        let id = Self::next_listener_id();
        let (tx, rx) = unbounded_channel();
        self.register(id, tx);
        (id, rx)
    }

    /// Unregister a listener
    pub fn unregister(&self, id: ListenerId) {
        self.lock().remove(&id);
    }

    /// Get count of registered listeners
    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    /// Broadcast a value to all registered listeners
    ///
    /// Listeners whose receiver is gone are pruned.
    pub fn broadcast(&self, value: &T) {
        self.lock()
            .retain(|_id, sender| sender.send(value.clone()).is_ok());
    }

    /// Send a value to a specific listener
    pub fn send_to(&self, id: ListenerId, value: T) -> Result<()> {
        let mut listeners = self.lock();

        match listeners.get(&id) {
            Some(sender) => {
                if sender.send(value).is_err() {
                    listeners.remove(&id);
                    return Err(DeckError::Other(format!("Listener {} disconnected", id)));
                }
                Ok(())
            },
            None => Err(DeckError::Other(format!("Listener {} not found", id))),
        }
    }
}

impl<T: Clone> Default for Hub<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_new() {
        let hub: Hub<String> = Hub::new();
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_register_and_unregister() {
        let hub: Hub<String> = Hub::new();
        let id1 = Hub::<String>::next_listener_id();
        let id2 = Hub::<String>::next_listener_id();

        let (tx1, _rx1) = unbounded_channel();
        let (tx2, _rx2) = unbounded_channel();

        hub.register(id1, tx1);
        assert_eq!(hub.listener_count(), 1);

        hub.register(id2, tx2);
        assert_eq!(hub.listener_count(), 2);

        hub.unregister(id1);
        assert_eq!(hub.listener_count(), 1);

        hub.unregister(id2);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_unique_listener_ids() {
        let id1 = Hub::<u8>::next_listener_id();
        let id2 = Hub::<u8>::next_listener_id();
        let id3 = Hub::<u8>::next_listener_id();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_unregister_nonexistent() {
        let hub: Hub<String> = Hub::new();
        hub.unregister(999);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_broadcast() {
        let hub: Hub<String> = Hub::new();

        let (_, mut rx1) = hub.attach();
        let (_, mut rx2) = hub.attach();
        let (_, mut rx3) = hub.attach();

        hub.broadcast(&"test message".to_string());

        assert_eq!(rx1.try_recv().unwrap(), "test message");
        assert_eq!(rx2.try_recv().unwrap(), "test message");
        assert_eq!(rx3.try_recv().unwrap(), "test message");
    }

    #[test]
    fn test_broadcast_prunes_dropped_receivers() {
        let hub: Hub<u32> = Hub::new();

        let (_, rx1) = hub.attach();
        let (_, mut rx2) = hub.attach();
        drop(rx1);

        hub.broadcast(&7);

        assert_eq!(hub.listener_count(), 1);
        assert_eq!(rx2.try_recv().unwrap(), 7);
    }

    #[test]
    fn test_send_to_listener() {
        let hub: Hub<&'static str> = Hub::new();

        let (id1, mut rx1) = hub.attach();
        let (_id2, mut rx2) = hub.attach();

        hub.send_to(id1, "message for listener 1").unwrap();

        assert_eq!(rx1.try_recv().unwrap(), "message for listener 1");
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn test_send_to_nonexistent_listener() {
        let hub: Hub<&'static str> = Hub::new();

        let result = hub.send_to(999, "test");

        match result {
            Err(DeckError::Other(msg)) => {
                assert!(msg.contains("Listener 999 not found"));
            },
            _ => panic!("Expected Other error"),
        }
    }
}
