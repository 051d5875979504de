//! Market data engine: the cache behind one reader/writer lock.
//!
//! All access to the cache goes through [`MarketDataEngine`]. Mutations take
//! the write lock, lookups take the read lock, and every value handed out is
//! a clone. Write-behind jobs are queued while the write lock is held, so
//! the store sees updates in the order the cache applied them. Subscribers
//! are notified after the lock is released so they can call back into the
//! engine.
//!
//! ```text
//! feed ──update_realtime──► [write lock] merge ticks, queue write-behind
//!                                                          │
//!                                                       release
//!                                                          │
//!                                  subscribers.handle() ◄──┘
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::deserialize::QueryableByName;
use diesel::sqlite::Sqlite;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::cache::MarketDataCache;
use crate::domain::{
    HistoricalBar, InstrumentAggregate, InstrumentCode, MarketEvent, RealTimeTick,
};
use crate::error::Result;
use crate::port::outbound::gateway::{JobKind, JobOutput, PersistenceGateway};
use crate::port::outbound::subscriber::{dispatch, Subscriber, SubscriberRegistry};

/// Everything guarded by the engine lock.
#[derive(Default)]
struct EngineState {
    cache: MarketDataCache,
    subscribers: SubscriberRegistry,
}

/// Facade over the market data cache, its lock, the subscriber registry
/// and the persistence gateway.
///
/// Construct one per process at the composition root and share it by
/// `Arc`. Tests build fresh instances.
pub struct MarketDataEngine<G> {
    state: RwLock<EngineState>,
    gateway: Arc<G>,
    write_behind: bool,
}

impl<G: PersistenceGateway> MarketDataEngine<G> {
    /// Create an engine with an empty cache.
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            state: RwLock::new(EngineState::default()),
            gateway,
            write_behind: false,
        }
    }

    /// Enable or disable write-behind of accepted updates.
    #[must_use]
    pub fn with_write_behind(mut self, enabled: bool) -> Self {
        self.write_behind = enabled;
        self
    }

    /// The persistence gateway.
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Load every profile and its bars from the gateway.
    ///
    /// Holds the write lock for the whole load. Everything is fetched before
    /// the cache is touched, so a gateway failure leaves the cache as it was.
    /// Returns the number of instruments loaded.
    ///
    /// # Errors
    /// Returns the gateway error if any fetch fails.
    pub fn load_all(&self) -> Result<usize> {
        let mut state = self.state.write();

        let profiles = self.gateway.fetch_all_profiles()?;
        let mut loaded = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let bars = self.gateway.fetch_historical_bars(&profile.code)?;
            let supplied = bars.len();
            let mut aggregate = InstrumentAggregate::new(profile);
            let malformed = aggregate.restore_historical_bars(bars);
            if malformed > 0 {
                warn!(
                    code = %aggregate.code(),
                    malformed,
                    supplied,
                    "Loaded malformed historical bars as stored"
                );
            }
            loaded.push(aggregate);
        }

        let mut count = 0;
        for aggregate in loaded {
            let code = aggregate.code().clone();
            match state.cache.insert(aggregate) {
                Ok(()) => count += 1,
                Err(e) => warn!(code = %code, error = %e, "Skipping instrument with empty profile"),
            }
        }

        info!(instruments = count, cached = state.cache.len(), "Loaded market data");
        Ok(count)
    }

    /// Insert or overwrite a single aggregate.
    ///
    /// Returns false when its profile is empty.
    pub fn add_instrument(&self, aggregate: InstrumentAggregate) -> bool {
        let code = aggregate.code().clone();
        match self.state.write().cache.insert(aggregate) {
            Ok(()) => true,
            Err(e) => {
                warn!(code = %code, error = %e, "Rejected instrument");
                false
            }
        }
    }

    /// Register a subscriber for engine events.
    ///
    /// Only a weak reference is kept; the caller owns the subscriber.
    pub fn attach_subscriber(&self, subscriber: &Arc<dyn Subscriber>) {
        let mut state = self.state.write();
        state.subscribers.prune();
        state.subscribers.attach(subscriber);
        debug!(subscribers = state.subscribers.len(), "Subscriber attached");
    }

    /// Deep copy of one instrument.
    #[must_use]
    pub fn get_copy(&self, code: &InstrumentCode) -> Option<InstrumentAggregate> {
        self.state.read().cache.get(code).cloned()
    }

    /// Deep copy of the whole cache, consistent across instruments.
    #[must_use]
    pub fn get_all_copy(&self) -> HashMap<InstrumentCode, InstrumentAggregate> {
        self.state.read().cache.snapshot()
    }

    /// Copy of one instrument's historical bars.
    #[must_use]
    pub fn get_historical_map_copy(
        &self,
        code: &InstrumentCode,
    ) -> Option<BTreeMap<NaiveDate, HistoricalBar>> {
        self.state
            .read()
            .cache
            .get(code)
            .map(InstrumentAggregate::historical_map_copy)
    }

    /// Copy of one instrument's real-time ticks.
    #[must_use]
    pub fn get_realtime_map_copy(
        &self,
        code: &InstrumentCode,
    ) -> Option<BTreeMap<DateTime<Utc>, RealTimeTick>> {
        self.state
            .read()
            .cache
            .get(code)
            .map(InstrumentAggregate::realtime_map_copy)
    }

    /// Merge a batch of feed ticks observed at `observed_at`.
    ///
    /// Ticks for unknown instruments are dropped and the batch carries on.
    /// Subscribers receive exactly one `RealtimeMarketValueUpdate` per call,
    /// after the lock is released, however many ticks were accepted.
    /// Returns the number of accepted ticks.
    pub fn update_realtime(&self, observed_at: DateTime<Utc>, ticks: Vec<RealTimeTick>) -> usize {
        let total = ticks.len();
        let accepted = {
            let mut state = self.state.write();
            let mut accepted = 0;
            let mut persisted = Vec::new();
            for tick in ticks {
                let Some(aggregate) = state.cache.get_mut(&tick.code) else {
                    warn!(code = %tick.code, "Real-time tick for unknown instrument dropped");
                    continue;
                };
                if self.write_behind {
                    persisted.push(tick.clone());
                }
                aggregate.add_realtime_tick(observed_at, tick);
                accepted += 1;
            }
            // Queued under the guard so persisted order matches merge order.
            if !persisted.is_empty() {
                self.persist_ticks(observed_at, persisted);
            }
            accepted
        };
        debug!(
            accepted,
            dropped = total - accepted,
            observed_at = %observed_at,
            "Merged real-time batch"
        );

        self.notify(MarketEvent::RealtimeMarketValueUpdate);
        accepted
    }

    /// Merge one bar for `code` under `date`.
    ///
    /// Returns false if the instrument is unknown or the bar is rejected.
    pub fn update_historical_by_date(
        &self,
        code: &InstrumentCode,
        date: NaiveDate,
        bar: HistoricalBar,
    ) -> bool {
        let persisted = self.write_behind.then(|| vec![bar.clone()]);
        let mut state = self.state.write();
        let Some(aggregate) = state.cache.get_mut(code) else {
            debug!(code = %code, %date, "Historical update for unknown instrument");
            return false;
        };
        let merged = aggregate.add_historical_bar(date, bar);
        if merged {
            if let Some(bars) = persisted {
                self.persist_bars(code, bars);
            }
        }
        merged
    }

    /// Merge a batch of bars for `code`.
    ///
    /// Returns false only if the instrument is unknown; malformed bars in the
    /// batch are skipped.
    pub fn update_historical_batch(&self, code: &InstrumentCode, bars: Vec<HistoricalBar>) -> bool {
        let persisted = if self.write_behind {
            bars.iter().filter(|b| b.validate().is_ok()).cloned().collect()
        } else {
            Vec::new()
        };
        let mut state = self.state.write();
        let Some(aggregate) = state.cache.get_mut(code) else {
            debug!(code = %code, "Historical batch for unknown instrument");
            return false;
        };
        let total = bars.len();
        let merged = aggregate.add_historical_bars(bars);
        debug!(code = %code, merged, skipped = total - merged, "Merged historical batch");
        if !persisted.is_empty() {
            self.persist_bars(code, persisted);
        }
        true
    }

    /// Empty every real-time store, leaving historical data untouched.
    ///
    /// With write-behind on, persisted ticks are purged as well.
    pub fn clear_all_realtime(&self) -> bool {
        let mut state = self.state.write();
        state.cache.clear_all_realtime();
        if self.write_behind {
            let queued = self.gateway.purge_ticks_async(Box::new(|result: Result<usize>| {
                match result {
                    Ok(removed) => debug!(removed, "Purged persisted ticks"),
                    Err(e) => warn!(error = %e, "Tick purge failed"),
                }
            }));
            if !queued {
                warn!("Tick purge not queued");
            }
        }
        info!(instruments = state.cache.len(), "Cleared real-time data");
        true
    }

    /// Bar for `code` on `date`.
    #[must_use]
    pub fn get_historical_by_date(
        &self,
        code: &InstrumentCode,
        date: NaiveDate,
    ) -> Option<HistoricalBar> {
        self.state.read().cache.get(code)?.historical_by_date(date)
    }

    /// Latest tick for `code`.
    #[must_use]
    pub fn get_current_realtime(&self, code: &InstrumentCode) -> Option<RealTimeTick> {
        self.state.read().cache.get(code)?.latest_realtime()
    }

    /// Tick for `code` observed at exactly `observed_at`.
    #[must_use]
    pub fn get_realtime_at(
        &self,
        code: &InstrumentCode,
        observed_at: DateTime<Utc>,
    ) -> Option<RealTimeTick> {
        self.state.read().cache.get(code)?.realtime_at(observed_at)
    }

    #[must_use]
    pub fn contains(&self, code: &InstrumentCode) -> bool {
        self.state.read().cache.contains(code)
    }

    /// Number of cached instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run a query against the backing store.
    ///
    /// # Errors
    /// Returns the gateway error.
    pub fn read_rows<R>(&self, query: &str) -> Result<Vec<R>>
    where
        R: QueryableByName<Sqlite> + 'static,
    {
        self.gateway.read_rows(query)
    }

    /// Execute a statement against the backing store.
    ///
    /// # Errors
    /// Returns the gateway error.
    pub fn write_statement(&self, statement: &str) -> Result<usize> {
        self.gateway.write_statement(statement)
    }

    /// Run a statement atomically against the backing store.
    ///
    /// # Errors
    /// Returns the gateway error.
    pub fn execute_procedure<R>(&self, statement: &str) -> Result<Vec<R>>
    where
        R: QueryableByName<Sqlite> + 'static,
    {
        self.gateway.execute_procedure(statement)
    }

    /// Queue a statement on the gateway's worker.
    pub fn submit_async_job<R, F>(&self, statement: &str, kind: JobKind, callback: F) -> bool
    where
        R: QueryableByName<Sqlite> + Send + 'static,
        F: FnOnce(Result<JobOutput<R>>) + Send + 'static,
    {
        self.gateway
            .submit_async_job(statement.to_owned(), kind, callback)
    }

    /// Queue ticks for write-behind. Call with the write guard held.
    fn persist_ticks(&self, observed_at: DateTime<Utc>, ticks: Vec<RealTimeTick>) {
        let queued = self.gateway.persist_ticks_async(
            observed_at,
            ticks,
            Box::new(move |result: Result<usize>| {
                if let Err(e) = result {
                    warn!(error = %e, observed_at = %observed_at, "Tick write-behind failed");
                }
            }),
        );
        if !queued {
            warn!(observed_at = %observed_at, "Tick write-behind not queued");
        }
    }

    /// Queue bars for write-behind. Call with the write guard held.
    fn persist_bars(&self, code: &InstrumentCode, bars: Vec<HistoricalBar>) {
        let log_code = code.clone();
        let queued = self.gateway.persist_bars_async(
            code.clone(),
            bars,
            Box::new(move |result: Result<usize>| {
                if let Err(e) = result {
                    warn!(code = %log_code, error = %e, "Bar write-behind failed");
                }
            }),
        );
        if !queued {
            warn!(code = %code, "Bar write-behind not queued");
        }
    }

    fn notify(&self, event: MarketEvent) {
        let subscribers = self.state.read().subscribers.live();
        dispatch(&subscribers, event);
    }
}
