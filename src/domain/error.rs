//! Domain validation errors for market data types.
//!
//! These errors are returned when a value would break an invariant of the
//! record stores or the cache, for example a bar whose high is below its
//! low or a profile without a code.

use chrono::NaiveDate;
use thiserror::Error;

use super::id::InstrumentCode;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Bar high must not be below its low.
    #[error("bar for {date} has high {high} below low {low}")]
    InvertedRange {
        /// Trading date of the bar.
        date: NaiveDate,
        /// Reported high.
        high: rust_decimal::Decimal,
        /// Reported low.
        low: rust_decimal::Decimal,
    },

    /// Prices cannot be negative.
    #[error("bar for {date} has negative price {price}")]
    NegativePrice {
        /// Trading date of the bar.
        date: NaiveDate,
        /// The offending price.
        price: rust_decimal::Decimal,
    },

    /// A bar was merged under a date that differs from its own.
    #[error("bar dated {bar_date} merged under {key}")]
    DateMismatch {
        /// Date the caller keyed the bar by.
        key: NaiveDate,
        /// Date carried by the bar.
        bar_date: NaiveDate,
    },

    /// Profiles must carry a code and a name.
    #[error("profile for '{code}' is empty")]
    EmptyProfile {
        /// The code of the rejected profile (may be empty).
        code: InstrumentCode,
    },
}
