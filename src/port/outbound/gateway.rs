//! Persistence gateway port.
//!
//! The gateway is the only component allowed to talk to the backing store.
//! It offers bulk reads used at load time, synchronous passthroughs for raw
//! statements, and a fire-and-forget job queue whose callbacks run on a
//! worker the caller does not control.
//!
//! Raw statements are opaque text. Callers choose the row type they want
//! back; any `QueryableByName` struct works, and [`NoRows`] covers jobs
//! that return nothing.

use chrono::{DateTime, Utc};
use diesel::deserialize::{self, QueryableByName};
use diesel::row::NamedRow;
use diesel::sqlite::Sqlite;

use crate::domain::{HistoricalBar, InstrumentCode, InstrumentProfile, RealTimeTick};
use crate::error::Result;

/// How an asynchronous job's statement is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Load rows.
    Read,
    /// Execute and report affected rows.
    Write,
    /// Load rows inside a single transaction.
    Procedure,
}

/// Result delivered to an asynchronous job's callback.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutput<R> {
    Rows(Vec<R>),
    Affected(usize),
}

impl<R> JobOutput<R> {
    /// Number of rows loaded or affected.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Rows(rows) => rows.len(),
            Self::Affected(n) => *n,
        }
    }
}

/// Row type for statements whose rows are not inspected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoRows;

impl QueryableByName<Sqlite> for NoRows {
    fn build<'a>(_row: &impl NamedRow<'a, Sqlite>) -> deserialize::Result<Self> {
        Ok(NoRows)
    }
}

/// Completion callback for write-behind jobs.
pub type PersistCallback = Box<dyn FnOnce(Result<usize>) + Send + 'static>;

/// Backing-store operations used by the engine.
pub trait PersistenceGateway: Send + Sync {
    /// Every instrument profile in the store.
    fn fetch_all_profiles(&self) -> Result<Vec<InstrumentProfile>>;

    /// Every historical bar stored for `code`, in any order.
    fn fetch_historical_bars(&self, code: &InstrumentCode) -> Result<Vec<HistoricalBar>>;

    /// Run a query and load its rows.
    fn read_rows<R>(&self, query: &str) -> Result<Vec<R>>
    where
        R: QueryableByName<Sqlite> + 'static;

    /// Execute a statement. Returns the number of affected rows.
    fn write_statement(&self, statement: &str) -> Result<usize>;

    /// Run a statement atomically and load its rows.
    fn execute_procedure<R>(&self, statement: &str) -> Result<Vec<R>>
    where
        R: QueryableByName<Sqlite> + 'static;

    /// Queue a statement for out-of-band execution.
    ///
    /// Returns false when the job was not accepted. An accepted job's
    /// callback runs exactly once, on the worker.
    fn submit_async_job<R, F>(&self, statement: String, kind: JobKind, callback: F) -> bool
    where
        R: QueryableByName<Sqlite> + Send + 'static,
        F: FnOnce(Result<JobOutput<R>>) + Send + 'static;

    /// Queue ticks accepted by the cache for write-behind.
    fn persist_ticks_async(
        &self,
        observed_at: DateTime<Utc>,
        ticks: Vec<RealTimeTick>,
        callback: PersistCallback,
    ) -> bool;

    /// Queue merged bars for write-behind.
    fn persist_bars_async(
        &self,
        code: InstrumentCode,
        bars: Vec<HistoricalBar>,
        callback: PersistCallback,
    ) -> bool;

    /// Queue removal of every persisted tick, mirroring a real-time clear.
    fn purge_ticks_async(&self, callback: PersistCallback) -> bool;
}
