//! Market data cache: instrument code to aggregate.
//!
//! This is the plain map without any locking. The engine wraps it in its
//! reader/writer lock and is the only owner; nothing outside the engine
//! sees a live reference.

use std::collections::HashMap;

use crate::domain::{DomainError, InstrumentAggregate, InstrumentCode};

/// Mapping of instrument code to its aggregate.
///
/// Every key present has a non-empty profile. A missing key means the
/// instrument is unknown, which is different from known-but-empty.
#[derive(Debug, Clone, Default)]
pub struct MarketDataCache {
    instruments: HashMap<InstrumentCode, InstrumentAggregate>,
}

impl MarketDataCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an aggregate, keyed by its profile code.
    ///
    /// # Errors
    /// Rejects aggregates whose profile is empty.
    pub fn insert(&mut self, aggregate: InstrumentAggregate) -> Result<(), DomainError> {
        aggregate.profile().validate()?;
        self.instruments.insert(aggregate.code().clone(), aggregate);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, code: &InstrumentCode) -> Option<&InstrumentAggregate> {
        self.instruments.get(code)
    }

    pub fn get_mut(&mut self, code: &InstrumentCode) -> Option<&mut InstrumentAggregate> {
        self.instruments.get_mut(code)
    }

    #[must_use]
    pub fn contains(&self, code: &InstrumentCode) -> bool {
        self.instruments.contains_key(code)
    }

    /// Clear the real-time store of every aggregate.
    pub fn clear_all_realtime(&mut self) {
        for aggregate in self.instruments.values_mut() {
            aggregate.clear_realtime();
        }
    }

    /// Deep copy of the whole map.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<InstrumentCode, InstrumentAggregate> {
        self.instruments.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InstrumentProfile;

    #[test]
    fn insert_rejects_empty_profile() {
        let mut cache = MarketDataCache::new();
        let result = cache.insert(InstrumentAggregate::new(InstrumentProfile::new("", "nameless")));

        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_overwrites_same_code() {
        let mut cache = MarketDataCache::new();
        cache
            .insert(InstrumentAggregate::new(InstrumentProfile::new("600000", "Old")))
            .unwrap();
        cache
            .insert(InstrumentAggregate::new(InstrumentProfile::new("600000", "New")))
            .unwrap();

        assert_eq!(cache.len(), 1);
        let code = InstrumentCode::from("600000");
        assert_eq!(cache.get(&code).unwrap().profile().name, "New");
    }

    #[test]
    fn unknown_code_is_absent() {
        let cache = MarketDataCache::new();
        assert!(!cache.contains(&InstrumentCode::from("UNKNOWN")));
    }
}
