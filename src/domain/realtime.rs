//! Per-instrument store of real-time ticks keyed by observation time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::tick::RealTimeTick;

/// Ordered map of observation time to tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RealTimeRecordStore {
    ticks: BTreeMap<DateTime<Utc>, RealTimeTick>,
}

impl RealTimeRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the tick observed at `observed_at`.
    pub fn insert(&mut self, observed_at: DateTime<Utc>, tick: RealTimeTick) {
        self.ticks.insert(observed_at, tick);
    }

    #[must_use]
    pub fn get(&self, observed_at: DateTime<Utc>) -> Option<&RealTimeTick> {
        self.ticks.get(&observed_at)
    }

    /// Tick with the maximum observation time.
    #[must_use]
    pub fn latest(&self) -> Option<&RealTimeTick> {
        self.ticks.values().next_back()
    }

    /// Drop every tick, e.g. at session rollover.
    pub fn clear(&mut self) {
        self.ticks.clear();
    }

    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<DateTime<Utc>, RealTimeTick> {
        &self.ticks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}
