//! Database model types for Diesel ORM.
//!
//! Prices are stored as TEXT so they round-trip through `Decimal` without
//! float loss. Dates are `YYYY-MM-DD`, timestamps RFC 3339.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use tracing::warn;

use super::schema::{historical_bars, instruments, realtime_ticks};
use crate::domain::{HistoricalBar, InstrumentCode, InstrumentProfile, RealTimeTick};
use crate::error::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database row for an instrument profile.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = instruments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InstrumentRow {
    pub code: String,
    pub name: String,
    pub industry: String,
    pub market: String,
    pub visit_heat: i32,
}

/// Database row for a daily bar.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = historical_bars)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BarRow {
    pub code: String,
    pub trade_date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: i64,
    pub amount: String,
}

/// Database row for a real-time tick.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = realtime_ticks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TickRow {
    pub code: String,
    pub observed_at: String,
    pub traded_at: String,
    pub price: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub prev_close: String,
    pub volume: i64,
    pub amount: String,
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| Error::Parse(format!("{field} '{raw}': {e}")))
}

fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("{field} '{raw}': {e}")))
}

fn parse_volume(raw: i64) -> Result<u64> {
    u64::try_from(raw).map_err(|_| Error::Parse(format!("volume {raw} is negative")))
}

/// SQLite integers are signed; larger volumes are stored as `i64::MAX`.
fn volume_to_i64(volume: u64) -> i64 {
    i64::try_from(volume).unwrap_or_else(|_| {
        warn!(volume, "Volume exceeds storable range, clamped");
        i64::MAX
    })
}

impl From<&InstrumentProfile> for InstrumentRow {
    fn from(profile: &InstrumentProfile) -> Self {
        Self {
            code: profile.code.to_string(),
            name: profile.name.clone(),
            industry: profile.industry.clone(),
            market: profile.market.clone(),
            visit_heat: i32::try_from(profile.visit_heat).unwrap_or_else(|_| {
                warn!(
                    code = %profile.code,
                    visit_heat = profile.visit_heat,
                    "Visit heat exceeds storable range, clamped"
                );
                i32::MAX
            }),
        }
    }
}

impl TryFrom<InstrumentRow> for InstrumentProfile {
    type Error = Error;

    fn try_from(row: InstrumentRow) -> Result<Self> {
        let visit_heat = u32::try_from(row.visit_heat)
            .map_err(|_| Error::Parse(format!("visit_heat {} is negative", row.visit_heat)))?;
        Ok(Self {
            code: InstrumentCode::from(row.code),
            name: row.name,
            industry: row.industry,
            market: row.market,
            visit_heat,
        })
    }
}

impl BarRow {
    pub fn from_bar(code: &InstrumentCode, bar: &HistoricalBar) -> Self {
        Self {
            code: code.to_string(),
            trade_date: bar.date.format(DATE_FORMAT).to_string(),
            open: bar.open.to_string(),
            high: bar.high.to_string(),
            low: bar.low.to_string(),
            close: bar.close.to_string(),
            volume: volume_to_i64(bar.volume),
            amount: bar.amount.to_string(),
        }
    }
}

impl TryFrom<BarRow> for HistoricalBar {
    type Error = Error;

    fn try_from(row: BarRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&row.trade_date, DATE_FORMAT)
            .map_err(|e| Error::Parse(format!("trade_date '{}': {e}", row.trade_date)))?;
        Ok(Self {
            date,
            open: parse_decimal("open", &row.open)?,
            high: parse_decimal("high", &row.high)?,
            low: parse_decimal("low", &row.low)?,
            close: parse_decimal("close", &row.close)?,
            volume: parse_volume(row.volume)?,
            amount: parse_decimal("amount", &row.amount)?,
        })
    }
}

impl TickRow {
    pub fn from_tick(observed_at: DateTime<Utc>, tick: &RealTimeTick) -> Self {
        Self {
            code: tick.code.to_string(),
            observed_at: observed_at.to_rfc3339(),
            traded_at: tick.traded_at.to_rfc3339(),
            price: tick.price.to_string(),
            open: tick.open.to_string(),
            high: tick.high.to_string(),
            low: tick.low.to_string(),
            prev_close: tick.prev_close.to_string(),
            volume: volume_to_i64(tick.volume),
            amount: tick.amount.to_string(),
        }
    }

    /// Parse back into the observation time and the tick.
    pub fn into_tick(self) -> Result<(DateTime<Utc>, RealTimeTick)> {
        let observed_at = parse_timestamp("observed_at", &self.observed_at)?;
        let tick = RealTimeTick {
            code: InstrumentCode::from(self.code),
            traded_at: parse_timestamp("traded_at", &self.traded_at)?,
            price: parse_decimal("price", &self.price)?,
            open: parse_decimal("open", &self.open)?,
            high: parse_decimal("high", &self.high)?,
            low: parse_decimal("low", &self.low)?,
            prev_close: parse_decimal("prev_close", &self.prev_close)?,
            volume: parse_volume(self.volume)?,
            amount: parse_decimal("amount", &self.amount)?,
        };
        Ok((observed_at, tick))
    }
}
