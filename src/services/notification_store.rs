//! In-memory store for user-facing notifications.
//!
//! Holds the few most recent notifications (newest first) and fans out every
//! change over a broadcast channel. Publishing never waits on subscribers; a
//! subscriber that falls behind sees `RecvError::Lagged` and skips ahead.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::NotificationsConfig;
use crate::models::{Notification, NotificationEvent, NotificationKind};

/// Receives the outcome messages produced by the scheduler.
///
/// Implementations must return promptly; the scheduler calls this inline.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NotificationKind, title: &str, description: &str);
}

#[derive(Clone)]
pub struct NotificationStore {
    limit: usize,
    items: Arc<Mutex<VecDeque<Notification>>>,
    events: broadcast::Sender<NotificationEvent>,
}

impl NotificationStore {
    pub fn new(config: &NotificationsConfig) -> Self {
        let (events, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            limit: config.limit.max(1),
            items: Arc::new(Mutex::new(VecDeque::new())),
            events,
        }
    }

    fn items(&self) -> std::sync::MutexGuard<'_, VecDeque<Notification>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Adds a notification, evicting the oldest beyond the limit.
    pub fn push(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Notification {
        let notification = Notification::new(kind, title, description);

        let evicted: Vec<Uuid> = {
            let mut items = self.items();
            items.push_front(notification.clone());
            let overflow = items.len().saturating_sub(self.limit);
            (0..overflow)
                .filter_map(|_| items.pop_back())
                .map(|n| n.id)
                .collect()
        };

        // No receivers is not an error for us
        let _ = self.events.send(NotificationEvent::Added {
            notification: notification.clone(),
        });
        for id in evicted {
            let _ = self.events.send(NotificationEvent::Dismissed { id });
        }

        tracing::debug!(id = %notification.id, kind = ?notification.kind, "Notification added");
        notification
    }

    /// Returns `false` when no notification has this id.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let removed = {
            let mut items = self.items();
            let before = items.len();
            items.retain(|n| n.id != id);
            items.len() != before
        };

        if removed {
            let _ = self.events.send(NotificationEvent::Dismissed { id });
        }
        removed
    }

    pub fn list(&self) -> Vec<Notification> {
        self.items().iter().cloned().collect()
    }

    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }
}

impl NotificationSink for NotificationStore {
    fn notify(&self, kind: NotificationKind, title: &str, description: &str) {
        self.push(kind, title, description);
    }
}
