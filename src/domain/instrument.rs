//! Instrument aggregate: profile plus both record stores.
//!
//! The aggregate does no locking of its own. Every mutating method is meant
//! to be called while the owner (the engine) holds its write lock, and the
//! engine only ever hands out clones.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use super::bar::HistoricalBar;
use super::history::HistoricalRecordStore;
use super::id::InstrumentCode;
use super::profile::InstrumentProfile;
use super::realtime::RealTimeRecordStore;
use super::tick::RealTimeTick;

/// The full in-memory record for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentAggregate {
    profile: InstrumentProfile,
    history: HistoricalRecordStore,
    realtime: RealTimeRecordStore,
}

impl InstrumentAggregate {
    /// Create an aggregate with empty stores.
    #[must_use]
    pub fn new(profile: InstrumentProfile) -> Self {
        Self {
            profile,
            history: HistoricalRecordStore::new(),
            realtime: RealTimeRecordStore::new(),
        }
    }

    #[must_use]
    pub fn code(&self) -> &InstrumentCode {
        &self.profile.code
    }

    #[must_use]
    pub fn profile(&self) -> &InstrumentProfile {
        &self.profile
    }

    #[must_use]
    pub fn history(&self) -> &HistoricalRecordStore {
        &self.history
    }

    #[must_use]
    pub fn realtime(&self) -> &RealTimeRecordStore {
        &self.realtime
    }

    /// Merge a batch of bars. Returns how many were accepted.
    pub fn add_historical_bars<I>(&mut self, bars: I) -> usize
    where
        I: IntoIterator<Item = HistoricalBar>,
    {
        self.history.merge(bars)
    }

    /// Replace history with bars read back from persistence, unvalidated.
    ///
    /// Returns how many of them are malformed.
    pub fn restore_historical_bars<I>(&mut self, bars: I) -> usize
    where
        I: IntoIterator<Item = HistoricalBar>,
    {
        self.history = HistoricalRecordStore::new();
        self.history.restore(bars)
    }

    /// Merge a single bar under `date`.
    ///
    /// Returns false when the bar is malformed or dated differently.
    pub fn add_historical_bar(&mut self, date: NaiveDate, bar: HistoricalBar) -> bool {
        match self.history.insert(date, bar) {
            Ok(()) => true,
            Err(e) => {
                debug!(code = %self.profile.code, error = %e, "Rejected historical bar");
                false
            }
        }
    }

    pub fn add_realtime_tick(&mut self, observed_at: DateTime<Utc>, tick: RealTimeTick) {
        self.realtime.insert(observed_at, tick);
    }

    #[must_use]
    pub fn historical_map_copy(&self) -> BTreeMap<NaiveDate, HistoricalBar> {
        self.history.as_map().clone()
    }

    #[must_use]
    pub fn realtime_map_copy(&self) -> BTreeMap<DateTime<Utc>, RealTimeTick> {
        self.realtime.as_map().clone()
    }

    #[must_use]
    pub fn historical_by_date(&self, date: NaiveDate) -> Option<HistoricalBar> {
        self.history.get(date).cloned()
    }

    #[must_use]
    pub fn realtime_at(&self, observed_at: DateTime<Utc>) -> Option<RealTimeTick> {
        self.realtime.get(observed_at).cloned()
    }

    #[must_use]
    pub fn latest_realtime(&self) -> Option<RealTimeTick> {
        self.realtime.latest().cloned()
    }

    pub fn clear_realtime(&mut self) {
        self.realtime.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn aggregate() -> InstrumentAggregate {
        InstrumentAggregate::new(InstrumentProfile::new("600000", "PF Bank"))
    }

    #[test]
    fn clone_is_deep() {
        let mut original = aggregate();
        let at = Utc.with_ymd_and_hms(2024, 1, 3, 1, 30, 0).unwrap();
        original.add_realtime_tick(at, RealTimeTick::new("600000", at, dec!(10.00)));

        let copy = original.clone();
        original.clear_realtime();

        assert!(original.latest_realtime().is_none());
        assert_eq!(copy.latest_realtime().unwrap().price, dec!(10.00));
    }

    #[test]
    fn add_historical_bar_rejects_malformed() {
        let mut agg = aggregate();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bad = HistoricalBar::new(date, dec!(10), dec!(9), dec!(11), dec!(10));

        assert!(!agg.add_historical_bar(date, bad));
        assert!(agg.historical_by_date(date).is_none());
    }

    #[test]
    fn clear_realtime_keeps_history() {
        let mut agg = aggregate();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 3, 1, 30, 0).unwrap();
        agg.add_historical_bars([HistoricalBar::new(
            date,
            dec!(9.9),
            dec!(10.1),
            dec!(9.8),
            dec!(10.0),
        )]);
        agg.add_realtime_tick(at, RealTimeTick::new("600000", at, dec!(10.05)));

        agg.clear_realtime();

        assert!(agg.realtime().is_empty());
        assert_eq!(agg.history().len(), 1);
    }
}
