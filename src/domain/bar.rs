//! Daily historical bar.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::money::{Amount, Price, Volume};

/// One trading day of OHLC data for an instrument.
///
/// Identity within a store is the `date`; merging a bar with a date that is
/// already present overwrites the earlier value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalBar {
    pub date: NaiveDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
    pub amount: Amount,
}

impl HistoricalBar {
    /// Create a bar with zero volume and turnover.
    #[must_use]
    pub fn new(date: NaiveDate, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume: 0,
            amount: Decimal::ZERO,
        }
    }

    /// Set traded volume and turnover.
    #[must_use]
    pub fn with_volume(mut self, volume: Volume, amount: Amount) -> Self {
        self.volume = volume;
        self.amount = amount;
        self
    }

    /// Check that prices are non-negative and the range is not inverted.
    pub fn validate(&self) -> Result<(), DomainError> {
        for price in [self.open, self.high, self.low, self.close] {
            if price.is_sign_negative() {
                return Err(DomainError::NegativePrice {
                    date: self.date,
                    price,
                });
            }
        }
        if self.high < self.low {
            return Err(DomainError::InvertedRange {
                date: self.date,
                high: self.high,
                low: self.low,
            });
        }
        Ok(())
    }
}
