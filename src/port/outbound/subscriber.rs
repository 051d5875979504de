//! Subscriber port for market data events.
//!
//! Subscribers are registered weakly: the registrant owns the subscriber
//! and dropping it silently removes it from future dispatches.

use std::sync::{Arc, Weak};

use crate::domain::MarketEvent;

/// Receives market data events.
pub trait Subscriber: Send + Sync {
    /// Handle an event.
    ///
    /// Runs on the thread that triggered the update, after the cache lock
    /// has been released. Should return quickly.
    fn handle(&self, event: MarketEvent);
}

/// Ordered set of weakly held subscribers.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: Vec<Weak<dyn Subscriber>>,
}

impl SubscriberRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Order of registration is dispatch order.
    pub fn attach(&mut self, subscriber: &Arc<dyn Subscriber>) {
        self.subscribers.push(Arc::downgrade(subscriber));
    }

    /// Strong handles to every subscriber still alive, in order.
    #[must_use]
    pub fn live(&self) -> Vec<Arc<dyn Subscriber>> {
        self.subscribers.iter().filter_map(Weak::upgrade).collect()
    }

    /// Forget subscribers whose owners dropped them. Returns how many.
    pub fn prune(&mut self) -> usize {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.strong_count() > 0);
        before - self.subscribers.len()
    }

    /// Number of registrations, including ones not yet pruned.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }
}

/// Dispatch `event` to each subscriber in order.
pub fn dispatch(subscribers: &[Arc<dyn Subscriber>], event: MarketEvent) {
    for subscriber in subscribers {
        subscriber.handle(event);
    }
}
