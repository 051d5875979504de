use std::sync::Arc;

use parking_lot::Mutex;
use sharecache::domain::MarketEvent;
use sharecache::port::Subscriber;

/// Thread-safe event collector for subscriber assertions in tests.
#[derive(Clone, Default)]
pub struct RecordingSubscriber {
    events: Arc<Mutex<Vec<MarketEvent>>>,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn events(&self) -> Vec<MarketEvent> {
        self.events.lock().clone()
    }
}

impl Subscriber for RecordingSubscriber {
    fn handle(&self, event: MarketEvent) {
        self.events.lock().push(event);
    }
}
