//! Event classes dispatched to subscribers.

use std::fmt;

/// Events the engine announces to its subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketEvent {
    /// A real-time batch has been merged into the cache.
    RealtimeMarketValueUpdate,
}

impl fmt::Display for MarketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RealtimeMarketValueUpdate => write!(f, "realtime_market_value_update"),
        }
    }
}
