//! Subscriber implementations shipped with the crate.

use tokio::sync::broadcast;
use tracing::info;

use crate::domain::MarketEvent;
use crate::port::outbound::subscriber::Subscriber;

/// Logs every event via tracing.
pub struct LogSubscriber;

impl Subscriber for LogSubscriber {
    fn handle(&self, event: MarketEvent) {
        info!(event = %event, "Market data event");
    }
}

/// Forwards events into a broadcast channel for async consumers.
pub struct ChannelSubscriber {
    tx: broadcast::Sender<MarketEvent>,
}

impl ChannelSubscriber {
    /// Create the subscriber and a first receiver.
    ///
    /// Additional receivers can be created via `subscribe()`.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<MarketEvent>) {
        let (tx, rx) = broadcast::channel(capacity);
        (Self { tx }, rx)
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.tx.subscribe()
    }
}

impl Subscriber for ChannelSubscriber {
    fn handle(&self, event: MarketEvent) {
        // No receivers is fine.
        let _ = self.tx.send(event);
    }
}
