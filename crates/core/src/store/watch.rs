//! Live query registry

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc::UnboundedReceiver;

use crate::hub::{Hub, ListenerId};
use crate::model::{PromptQuery, PromptRecord};

/// Full result set of a live query at one point in time
pub type Snapshot = Vec<PromptRecord>;

/// Tracks the query behind every live subscription
#[derive(Clone, Default)]
pub struct Watchers {
    hub:     Hub<Snapshot>,
    queries: Arc<Mutex<HashMap<ListenerId, PromptQuery>>>,
}

impl Watchers {
    pub fn new() -> Self {
        Self::default()
    }

    fn queries(&self) -> MutexGuard<'_, HashMap<ListenerId, PromptQuery>> {
        self.queries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register `query` and deliver `initial` to it right away
    pub fn subscribe(&self, query: PromptQuery, initial: Snapshot) -> Subscription {
        let (id, rx) = self.hub.attach();
        self.queries().insert(id, query);
        let _ = self.hub.send_to(id, initial);
        tracing::debug!(listener = id, "live query registered");

        Subscription {
            id,
            rx,
            watchers: self.clone(),
        }
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        if self.queries().remove(&id).is_some() {
            self.hub.unregister(id);
            tracing::debug!(listener = id, "live query unregistered");
        }
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.queries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push a fresh snapshot to every live query
    ///
    /// `select` evaluates one query against the current record set.
    pub fn publish<F>(&self, select: F)
    where
        F: Fn(&PromptQuery) -> Snapshot,
    {
        let mut queries = self.queries();
        let mut gone = Vec::new();

        for (id, query) in queries.iter() {
            if self.hub.send_to(*id, select(query)).is_err() {
                gone.push(*id);
            }
        }

        for id in gone {
            queries.remove(&id);
        }
    }
}

/// Handle to a live query; dropping it unregisters the listener
pub struct Subscription {
    id:       ListenerId,
    rx:       UnboundedReceiver<Snapshot>,
    watchers: Watchers,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Next queued snapshot, if any, without waiting
    pub fn try_next(&mut self) -> Option<Snapshot> {
        self.rx.try_recv().ok()
    }

    /// Drain everything queued and keep only the newest snapshot
    pub fn latest(&mut self) -> Option<Snapshot> {
        let mut newest = None;
        while let Some(snapshot) = self.try_next() {
            newest = Some(snapshot);
        }
        newest
    }

    /// Wait for the next snapshot; `None` once the store is gone
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.watchers.unsubscribe(self.id);
    }
}
