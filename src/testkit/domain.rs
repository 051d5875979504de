//! Builders for domain primitives used across tests.
//!
//! All dates fall in January 2024 and all timestamps on 2 January 2024
//! from 09:30 UTC, so tests can refer to them by a small integer.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::{HistoricalBar, InstrumentProfile, RealTimeTick};

/// `2024-01-{day}`.
pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).expect("valid test date")
}

/// `2024-01-02 09:30:00 UTC` plus `seconds`.
pub fn timestamp(seconds: i64) -> DateTime<Utc> {
    let open = date(2)
        .and_hms_opt(9, 30, 0)
        .expect("valid test time")
        .and_utc();
    open + Duration::seconds(seconds)
}

/// Profile with the given code and name and no classification.
pub fn profile(code: &str, name: &str) -> InstrumentProfile {
    InstrumentProfile::new(code, name)
}

/// Flat bar on `2024-01-{day}` where every price equals `close`.
pub fn bar(day: u32, close: Decimal) -> HistoricalBar {
    HistoricalBar::new(date(day), close, close, close, close)
}

/// Tick for `code` traded at `timestamp(seconds)`.
pub fn tick(code: &str, seconds: i64, price: Decimal) -> RealTimeTick {
    RealTimeTick::new(code, timestamp(seconds), price)
}
