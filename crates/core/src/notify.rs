//! User-facing transient notices
//!
//! Every collaborator call site reports its outcome here instead of
//! propagating a failure to the caller's UI loop. Notices are broadcast to
//! all registered listeners and mirrored to `tracing`.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::errors::DeckError;
use crate::hub::{Hub, ListenerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A single toast-style message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level:   NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Broadcasts notices to registered listeners
#[derive(Clone, Default)]
pub struct Notifier {
    hub: Hub<Notice>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; drop the receiver (or call [`Self::detach`]) to stop
    pub fn attach(&self) -> (ListenerId, UnboundedReceiver<Notice>) {
        self.hub.attach()
    }

    pub fn detach(&self, id: ListenerId) {
        self.hub.unregister(id);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Success, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Error, message.into());
    }

    /// Report a failed operation: `context` is the headline, the error adds detail
    pub fn failure(&self, context: &str, err: &DeckError) {
        tracing::warn!(category = err.category(), error = %err, "{}", context);
        let detail = err.user_message();
        let message = if detail.is_empty() {
            context.to_string()
        } else {
            format!("{}: {}", context, detail)
        };
        self.hub.broadcast(&Notice {
            level: NoticeLevel::Error,
            message,
        });
    }

    fn emit(&self, level: NoticeLevel, message: String) {
        match level {
            NoticeLevel::Error => tracing::warn!(notice = %message),
            _ => tracing::debug!(notice = %message),
        }
        self.hub.broadcast(&Notice { level, message });
    }
}

/// Drain every notice currently queued on `rx`
pub fn drain(rx: &mut UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_notice_reaches_listener() {
        let notifier = Notifier::new();
        let (_id, mut rx) = notifier.attach();

        notifier.success("Prompt added successfully!");

        let notice = rx.try_recv().unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "Prompt added successfully!");
    }

    #[test]
    fn test_failure_includes_error_detail() {
        let notifier = Notifier::new();
        let (_id, mut rx) = notifier.attach();

        notifier.failure(
            "Failed to add prompt",
            &DeckError::collaborator("unavailable", "Network unreachable"),
        );

        let notice = rx.try_recv().unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.message, "Failed to add prompt: Network unreachable");
    }

    #[test]
    fn test_broadcast_to_multiple_listeners() {
        let notifier = Notifier::new();
        let (_a, mut rx1) = notifier.attach();
        let (_b, mut rx2) = notifier.attach();

        notifier.info("Removed like");

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn test_detached_listener_gets_nothing() {
        let notifier = Notifier::new();
        let (id, mut rx) = notifier.attach();
        notifier.detach(id);

        notifier.error("boom");

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_drain_collects_in_order() {
        let notifier = Notifier::new();
        let (_id, mut rx) = notifier.attach();

        notifier.info("one");
        notifier.error("two");

        let notices = drain(&mut rx);
        let messages: Vec<_> = notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["one", "two"]);
    }
}
