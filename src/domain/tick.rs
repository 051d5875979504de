//! Real-time quote observation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::InstrumentCode;
use super::money::{Amount, Price, Volume};

/// A single real-time observation of an instrument from the quote feed.
///
/// The tick carries the code it refers to so that a feed batch can be a
/// flat list. Within a store it is keyed by the batch observation time,
/// not by `traded_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealTimeTick {
    pub code: InstrumentCode,
    pub traded_at: DateTime<Utc>,
    pub price: Price,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub prev_close: Price,
    pub volume: Volume,
    pub amount: Amount,
}

impl RealTimeTick {
    /// Create a tick where open/high/low equal the last price.
    pub fn new(code: impl Into<InstrumentCode>, traded_at: DateTime<Utc>, price: Price) -> Self {
        Self {
            code: code.into(),
            traded_at,
            price,
            open: price,
            high: price,
            low: price,
            prev_close: price,
            volume: 0,
            amount: Decimal::ZERO,
        }
    }

    /// Set the previous session close used for change calculations.
    #[must_use]
    pub fn with_prev_close(mut self, prev_close: Price) -> Self {
        self.prev_close = prev_close;
        self
    }

    /// Set accumulated session volume and turnover.
    #[must_use]
    pub fn with_volume(mut self, volume: Volume, amount: Amount) -> Self {
        self.volume = volume;
        self.amount = amount;
        self
    }

    /// Absolute change against the previous close.
    #[must_use]
    pub fn change(&self) -> Decimal {
        self.price - self.prev_close
    }

    /// Percentage change against the previous close.
    ///
    /// Returns `None` when the previous close is zero.
    #[must_use]
    pub fn change_percent(&self) -> Option<Decimal> {
        if self.prev_close.is_zero() {
            return None;
        }
        Some(self.change() / self.prev_close * Decimal::ONE_HUNDRED)
    }
}
