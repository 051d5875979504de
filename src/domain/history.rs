//! Per-instrument store of daily bars keyed by trading date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::bar::HistoricalBar;
use super::error::DomainError;

/// Ordered map of trading date to bar.
///
/// Merging is insert-or-overwrite: a later bar for the same date replaces
/// the earlier one, so a date never holds more than one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoricalRecordStore {
    bars: BTreeMap<NaiveDate, HistoricalBar>,
}

impl HistoricalRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a sequence of bars, each keyed by its own date.
    ///
    /// Malformed bars are skipped. Returns the number of bars merged.
    pub fn merge<I>(&mut self, bars: I) -> usize
    where
        I: IntoIterator<Item = HistoricalBar>,
    {
        let mut merged = 0;
        for bar in bars {
            let date = bar.date;
            if self.insert(date, bar).is_ok() {
                merged += 1;
            }
        }
        merged
    }

    /// Take stored bars as-is, each keyed by its own date.
    ///
    /// Used when loading from persistence: the store must mirror what was
    /// persisted, so nothing is validated. Returns how many of the bars fail
    /// validation.
    pub fn restore<I>(&mut self, bars: I) -> usize
    where
        I: IntoIterator<Item = HistoricalBar>,
    {
        let mut malformed = 0;
        for bar in bars {
            if bar.validate().is_err() {
                malformed += 1;
            }
            self.bars.insert(bar.date, bar);
        }
        malformed
    }

    /// Insert or overwrite the bar for `date`.
    pub fn insert(&mut self, date: NaiveDate, bar: HistoricalBar) -> Result<(), DomainError> {
        if bar.date != date {
            return Err(DomainError::DateMismatch {
                key: date,
                bar_date: bar.date,
            });
        }
        bar.validate()?;
        self.bars.insert(date, bar);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&HistoricalBar> {
        self.bars.get(&date)
    }

    /// Most recent bar by date.
    #[must_use]
    pub fn latest(&self) -> Option<&HistoricalBar> {
        self.bars.values().next_back()
    }

    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<NaiveDate, HistoricalBar> {
        &self.bars
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
