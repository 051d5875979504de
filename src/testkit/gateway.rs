//! In-memory persistence gateway.
//!
//! Serves profiles and bars from memory, records every statement it is
//! handed and runs job callbacks inline on the calling thread. Nothing is
//! executed, so row-returning calls always come back empty.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::deserialize::QueryableByName;
use diesel::sqlite::Sqlite;
use parking_lot::Mutex;

use crate::domain::{HistoricalBar, InstrumentCode, InstrumentProfile, RealTimeTick};
use crate::error::{Error, Result};
use crate::port::outbound::gateway::{JobKind, JobOutput, PersistCallback, PersistenceGateway};

#[derive(Default)]
pub struct MemoryGateway {
    profiles: Vec<InstrumentProfile>,
    bars: HashMap<InstrumentCode, Vec<HistoricalBar>>,
    failing_bars: Option<InstrumentCode>,
    rejecting_jobs: bool,
    statements: Mutex<Vec<(JobKind, String)>>,
    persisted_ticks: Mutex<Vec<(DateTime<Utc>, RealTimeTick)>>,
    persisted_bars: Mutex<Vec<(InstrumentCode, HistoricalBar)>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `profile` and `bars` from the bulk fetches.
    #[must_use]
    pub fn with_instrument(mut self, profile: InstrumentProfile, bars: Vec<HistoricalBar>) -> Self {
        self.bars.insert(profile.code.clone(), bars);
        self.profiles.push(profile);
        self
    }

    /// Fail `fetch_historical_bars` for `code`.
    #[must_use]
    pub fn failing_bars_for(mut self, code: &str) -> Self {
        self.failing_bars = Some(InstrumentCode::from(code));
        self
    }

    /// Refuse every asynchronous job, as a full queue would.
    #[must_use]
    pub fn rejecting_jobs(mut self) -> Self {
        self.rejecting_jobs = true;
        self
    }

    /// Every statement received, in order, tagged with how it was run.
    /// Synchronous reads and writes are tagged `Read` and `Write`.
    pub fn statements(&self) -> Vec<(JobKind, String)> {
        self.statements.lock().clone()
    }

    pub fn persisted_ticks(&self) -> Vec<(DateTime<Utc>, RealTimeTick)> {
        self.persisted_ticks.lock().clone()
    }

    pub fn persisted_bars(&self) -> Vec<(InstrumentCode, HistoricalBar)> {
        self.persisted_bars.lock().clone()
    }

    fn record(&self, kind: JobKind, statement: &str) {
        self.statements.lock().push((kind, statement.to_string()));
    }
}

impl PersistenceGateway for MemoryGateway {
    fn fetch_all_profiles(&self) -> Result<Vec<InstrumentProfile>> {
        Ok(self.profiles.clone())
    }

    fn fetch_historical_bars(&self, code: &InstrumentCode) -> Result<Vec<HistoricalBar>> {
        if self.failing_bars.as_ref() == Some(code) {
            return Err(Error::Database(format!("bars unavailable for {code}")));
        }
        Ok(self.bars.get(code).cloned().unwrap_or_default())
    }

    fn read_rows<R>(&self, query: &str) -> Result<Vec<R>>
    where
        R: QueryableByName<Sqlite> + 'static,
    {
        self.record(JobKind::Read, query);
        Ok(Vec::new())
    }

    fn write_statement(&self, statement: &str) -> Result<usize> {
        self.record(JobKind::Write, statement);
        Ok(0)
    }

    fn execute_procedure<R>(&self, statement: &str) -> Result<Vec<R>>
    where
        R: QueryableByName<Sqlite> + 'static,
    {
        self.record(JobKind::Procedure, statement);
        Ok(Vec::new())
    }

    fn submit_async_job<R, F>(&self, statement: String, kind: JobKind, callback: F) -> bool
    where
        R: QueryableByName<Sqlite> + Send + 'static,
        F: FnOnce(Result<JobOutput<R>>) + Send + 'static,
    {
        if self.rejecting_jobs {
            return false;
        }
        self.record(kind, &statement);
        let output = match kind {
            JobKind::Write => JobOutput::Affected(0),
            JobKind::Read | JobKind::Procedure => JobOutput::Rows(Vec::new()),
        };
        callback(Ok(output));
        true
    }

    fn persist_ticks_async(
        &self,
        observed_at: DateTime<Utc>,
        ticks: Vec<RealTimeTick>,
        callback: PersistCallback,
    ) -> bool {
        if self.rejecting_jobs {
            return false;
        }
        let count = ticks.len();
        self.persisted_ticks
            .lock()
            .extend(ticks.into_iter().map(|tick| (observed_at, tick)));
        callback(Ok(count));
        true
    }

    fn persist_bars_async(
        &self,
        code: InstrumentCode,
        bars: Vec<HistoricalBar>,
        callback: PersistCallback,
    ) -> bool {
        if self.rejecting_jobs {
            return false;
        }
        let count = bars.len();
        self.persisted_bars
            .lock()
            .extend(bars.into_iter().map(|bar| (code.clone(), bar)));
        callback(Ok(count));
        true
    }

    fn purge_ticks_async(&self, callback: PersistCallback) -> bool {
        if self.rejecting_jobs {
            return false;
        }
        let removed = {
            let mut ticks = self.persisted_ticks.lock();
            let removed = ticks.len();
            ticks.clear();
            removed
        };
        callback(Ok(removed));
        true
    }
}
