//! Session collaborator and the flow wrapped around it
//!
//! The identity service is consumed through [`AuthBackend`]. Session
//! presence is push-based: every backend owns a [`SessionChannel`] and
//! publishes each transition to it, so the view layer and the dashboard gate
//! react to changes instead of polling.

mod flow;
mod memory;

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

pub use flow::{SessionFlow, SignUpForm};
pub use memory::MemoryAuth;

use crate::errors::Result;
use crate::hub::{Hub, ListenerId};
use crate::model::{AuthProvider, SessionUser};

/// What a session observer receives: the signed-in user, or `None`
pub type SessionEvent = Option<SessionUser>;

/// Identity service operations
///
/// Failures surface as [`crate::errors::DeckError::Collaborator`] carrying the
/// service's error code.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Create a password credential and sign it in
    async fn sign_up(&self, email: &str, password: &str, display_name: &str)
        -> Result<SessionUser>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser>;

    /// Popup/redirect sign-in through an OAuth provider
    async fn sign_in_with_provider(&self, provider: AuthProvider) -> Result<SessionUser>;

    async fn sign_out(&self) -> Result<()>;

    /// Observe session transitions, starting with the current value
    fn observe(&self) -> SessionSubscription;

    fn current_user(&self) -> Option<SessionUser>;
}

/// Single current-session value plus the listeners interested in it
#[derive(Clone, Default)]
pub struct SessionChannel {
    current: Arc<Mutex<SessionEvent>>,
    hub:     Hub<SessionEvent>,
}

impl SessionChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionEvent> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn current(&self) -> SessionEvent {
        self.lock().clone()
    }

    /// Replace the current value, notifying listeners only when it changed
    pub fn publish(&self, next: SessionEvent) -> bool {
        let mut current = self.lock();
        if *current == next {
            return false;
        }

        tracing::debug!(
            uid = next.as_ref().map(|u| u.uid.as_str()).unwrap_or("-"),
            listeners = self.hub.listener_count(),
            "session changed"
        );
        *current = next;
        self.hub.broadcast(&current);
        true
    }

    /// Register a listener; it receives the current value right away
    pub fn subscribe(&self) -> SessionSubscription {
        // Hold the value lock so no publish slips in between attach and send.
        let current = self.lock();
        let (id, rx) = self.hub.attach();
        let _ = self.hub.send_to(id, current.clone());

        SessionSubscription {
            id,
            rx,
            channel: self.clone(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.hub.listener_count()
    }
}

/// Handle to a session observer; dropping it unregisters the listener
pub struct SessionSubscription {
    id:      ListenerId,
    rx:      UnboundedReceiver<SessionEvent>,
    channel: SessionChannel,
}

impl SessionSubscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Next queued transition without waiting
    pub fn try_next(&mut self) -> Option<SessionEvent> {
        self.rx.try_recv().ok()
    }

    pub async fn next(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        self.channel.hub.unregister(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(uid: &str) -> SessionUser {
        SessionUser {
            uid:          uid.to_string(),
            email:        format!("{}@example.com", uid),
            display_name: None,
            avatar_url:   None,
            provider:     AuthProvider::Password,
        }
    }

    #[test]
    fn test_subscribe_receives_current_value() {
        let channel = SessionChannel::new();
        channel.publish(Some(user("u1")));

        let mut sub = channel.subscribe();
        assert_eq!(sub.try_next(), Some(Some(user("u1"))));
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn test_publish_same_value_does_not_notify() {
        let channel = SessionChannel::new();
        let mut sub = channel.subscribe();
        assert_eq!(sub.try_next(), Some(None));

        assert!(!channel.publish(None));
        assert!(channel.publish(Some(user("u1"))));
        assert!(!channel.publish(Some(user("u1"))));
        assert!(channel.publish(None));

        assert_eq!(sub.try_next(), Some(Some(user("u1"))));
        assert_eq!(sub.try_next(), Some(None));
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn test_drop_unregisters_listener() {
        let channel = SessionChannel::new();
        let sub = channel.subscribe();
        assert_eq!(channel.listener_count(), 1);

        drop(sub);
        assert_eq!(channel.listener_count(), 0);
    }
}
