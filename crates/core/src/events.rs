//! Event bus - publish/subscribe channel for engine notifications
//!
//! The game state owns one bus. Every published [`Notification`] is handed to
//! each subscriber in registration order. Pull-style consumers drain a pending
//! list with [`EventBus::take_events`] instead.
//!
//! The pending list is only filled while buffering is on. By default that is
//! while nobody is subscribed, so a push-only host never accumulates events;
//! [`EventBus::set_buffered`] overrides it either way.

use std::fmt;

use crate::types::Notification;

/// Callback invoked for every notification
pub type Subscriber = Box<dyn FnMut(&Notification)>;

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    pending: Vec<Notification>,
    next_id: u64,
    /// Explicit buffering choice; `None` buffers only without subscribers
    buffered: Option<bool>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Notification) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, notification: Notification) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&notification);
        }
        if self.is_buffered() {
            self.pending.push(notification);
        }
    }

    /// Force buffering on or off regardless of subscribers
    ///
    /// Turning it off drops whatever is still pending.
    pub fn set_buffered(&mut self, buffered: bool) {
        self.buffered = Some(buffered);
        if !buffered {
            self.pending.clear();
        }
    }

    pub fn is_buffered(&self) -> bool {
        self.buffered.unwrap_or(self.subscribers.is_empty())
    }

    /// Drain everything published since the last call
    pub fn take_events(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("pending", &self.pending)
            .field("buffered", &self.is_buffered())
            .finish()
    }
}
