//! In-process notification fan-out
//!
//! Routes subscribe interest in an account's status changes; the notification
//! service pushes events through here after persisting them. Listeners run
//! synchronously on the caller's thread, so they must be cheap. A panicking
//! listener is isolated and dropped from the delivery, it never poisons the
//! registry or the other listeners.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::notification::NotificationType;

/// Event delivered to listeners when an account's status changes
#[derive(Debug, Clone, Serialize)]
pub struct StatusChangeEvent {
    pub account_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: Option<String>,
    pub data: serde_json::Value,
}

type Listener = Arc<dyn Fn(&StatusChangeEvent) + Send + Sync>;

/// Handle returned by [`NotificationRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId {
    account_id: Uuid,
    seq: u64,
}

/// Per-account listener registry
#[derive(Default)]
pub struct NotificationRegistry {
    listeners: RwLock<HashMap<Uuid, Vec<(u64, Listener)>>>,
    next_seq: AtomicU64,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one account's events
    pub fn subscribe<F>(&self, account_id: Uuid, listener: F) -> SubscriptionId
    where
        F: Fn(&StatusChangeEvent) + Send + Sync + 'static,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .entry(account_id)
            .or_default()
            .push((seq, Arc::new(listener)));

        SubscriptionId { account_id, seq }
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut guard = self.listeners.write();
        let Some(entries) = guard.get_mut(&id.account_id) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(seq, _)| *seq != id.seq);
        let removed = entries.len() < before;
        if entries.is_empty() {
            guard.remove(&id.account_id);
        }
        removed
    }

    /// Deliver an event to the listeners of one account
    pub fn notify(&self, account_id: Uuid, event: &StatusChangeEvent) {
        // Clone the listener handles out so delivery never holds the lock.
        let targets: Vec<Listener> = {
            let guard = self.listeners.read();
            guard
                .get(&account_id)
                .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
                .unwrap_or_default()
        };

        for listener in targets {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                tracing::error!(
                    account_id = %account_id,
                    notification_type = %event.notification_type,
                    "Notification listener panicked"
                );
            }
        }
    }

    /// Deliver an event to every registered listener, regardless of account
    pub fn notify_all(&self, event: &StatusChangeEvent) {
        let targets: Vec<Listener> = {
            let guard = self.listeners.read();
            guard
                .values()
                .flat_map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)))
                .collect()
        };

        for listener in targets {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                tracing::error!(
                    notification_type = %event.notification_type,
                    "Notification listener panicked during broadcast"
                );
            }
        }
    }

    /// Drop all listeners (shutdown)
    pub fn clear(&self) {
        self.listeners.write().clear();
    }

    pub fn subscriber_count(&self, account_id: Uuid) -> usize {
        self.listeners
            .read()
            .get(&account_id)
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn event_for(account_id: Uuid) -> StatusChangeEvent {
        StatusChangeEvent {
            account_id,
            notification_type: NotificationType::System,
            title: "test".to_string(),
            message: None,
            data: serde_json::json!({}),
        }
    }

    #[test]
    fn delivers_to_all_listeners_of_the_account() {
        let registry = NotificationRegistry::new();
        let account = Uuid::new_v4();
        let other = Uuid::new_v4();

        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let hits = Arc::clone(&hits);
            registry.subscribe(account, move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }
        let other_hits = Arc::new(AtomicUsize::new(0));
        {
            let other_hits = Arc::clone(&other_hits);
            registry.subscribe(other, move |_| {
                other_hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        registry.notify(account, &event_for(account));

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(other_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn panicking_listener_does_not_block_others() {
        let registry = NotificationRegistry::new();
        let account = Uuid::new_v4();

        registry.subscribe(account, |_| panic!("boom"));
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let hits = Arc::clone(&hits);
            registry.subscribe(account, move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        registry.notify(account, &event_for(account));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Registry stays usable after the panic
        registry.notify(account, &event_for(account));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let registry = NotificationRegistry::new();
        let account = Uuid::new_v4();

        let hits = Arc::new(AtomicUsize::new(0));
        let id = {
            let hits = Arc::clone(&hits);
            registry.subscribe(account, move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };

        registry.notify(account, &event_for(account));
        assert!(registry.unsubscribe(id));
        registry.notify(account, &event_for(account));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!registry.unsubscribe(id));
        assert_eq!(registry.subscriber_count(account), 0);
    }

    #[test]
    fn notify_all_reaches_every_account() {
        let registry = NotificationRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            let hits = Arc::clone(&hits);
            registry.subscribe(Uuid::new_v4(), move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        registry.notify_all(&event_for(Uuid::new_v4()));
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn clear_drops_all_listeners() {
        let registry = NotificationRegistry::new();
        let account = Uuid::new_v4();

        let hits = Arc::new(AtomicUsize::new(0));
        {
            let hits = Arc::clone(&hits);
            registry.subscribe(account, move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        registry.clear();
        registry.notify(account, &event_for(account));

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(registry.subscriber_count(account), 0);
    }
}
