//! Monetary types for price, turnover and volume representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Turnover (price times volume) represented as a Decimal.
pub type Amount = Decimal;

/// Traded volume in shares.
pub type Volume = u64;
