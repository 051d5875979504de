//! SQLite-backed persistence gateway using Diesel.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::deserialize::QueryableByName;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use tracing::{debug, info, warn};

use super::database::model::{BarRow, InstrumentRow, TickRow};
use super::database::schema::{historical_bars, instruments, realtime_ticks};
use super::database::{configure_sqlite_connection, create_pool, run_migrations, DbPool};
use super::jobs::JobQueue;
use crate::domain::{HistoricalBar, InstrumentCode, InstrumentProfile, RealTimeTick};
use crate::error::{Error, Result};
use crate::infrastructure::config::database::{DatabaseConfig, JobsConfig};
use crate::port::outbound::gateway::{
    JobKind, JobOutput, PersistCallback, PersistenceGateway,
};

/// Persistence gateway over a pooled SQLite database.
pub struct SqliteGateway {
    pool: DbPool,
    jobs: JobQueue,
    busy_timeout_ms: u64,
}

impl SqliteGateway {
    /// Open the database, apply migrations and start the job worker.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be created, migrations fail or
    /// the worker thread cannot be spawned.
    pub fn connect(database: &DatabaseConfig, jobs: &JobsConfig) -> Result<Self> {
        let pool = create_pool(&database.url, database.pool_size)?;
        run_migrations(&pool)?;
        let queue = JobQueue::start(pool.clone(), jobs.queue_capacity, database.busy_timeout_ms)?;
        info!(url = %database.url, pool_size = database.pool_size, "Connected to market data store");
        Ok(Self::with_parts(pool, queue, database.busy_timeout_ms))
    }

    /// Assemble a gateway from an existing pool and queue.
    #[must_use]
    pub fn with_parts(pool: DbPool, jobs: JobQueue, busy_timeout_ms: u64) -> Self {
        Self {
            pool,
            jobs,
            busy_timeout_ms,
        }
    }

    /// Stop the job worker after it drains queued jobs.
    pub fn shutdown(&self) {
        self.jobs.shutdown();
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        if let Err(e) = configure_sqlite_connection(&mut conn, self.busy_timeout_ms) {
            warn!(error = %e, "Failed to configure SQLite connection");
        }
        Ok(conn)
    }

    /// Insert or replace a profile.
    pub fn save_profile(&self, profile: &InstrumentProfile) -> Result<()> {
        let row = InstrumentRow::from(profile);
        let mut conn = self.conn()?;
        diesel::replace_into(instruments::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Insert or replace bars for `code`. Returns rows written.
    pub fn save_bars(&self, code: &InstrumentCode, bars: &[HistoricalBar]) -> Result<usize> {
        let mut conn = self.conn()?;
        write_bars(&mut conn, code, bars)
    }

    /// Every persisted tick for `code`, ordered by observation time.
    pub fn fetch_realtime_ticks(
        &self,
        code: &InstrumentCode,
    ) -> Result<Vec<(DateTime<Utc>, RealTimeTick)>> {
        let mut conn = self.conn()?;
        let rows: Vec<TickRow> = realtime_ticks::table
            .filter(realtime_ticks::code.eq(code.as_str()))
            .order(realtime_ticks::observed_at.asc())
            .select(TickRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.into_iter().map(TickRow::into_tick).collect()
    }
}

fn write_bars(
    conn: &mut SqliteConnection,
    code: &InstrumentCode,
    bars: &[HistoricalBar],
) -> Result<usize> {
    conn.transaction(|conn| {
        let mut written = 0;
        for bar in bars {
            written += diesel::replace_into(historical_bars::table)
                .values(&BarRow::from_bar(code, bar))
                .execute(conn)?;
        }
        Ok::<usize, diesel::result::Error>(written)
    })
    .map_err(|e| Error::Database(e.to_string()))
}

fn write_ticks(
    conn: &mut SqliteConnection,
    observed_at: DateTime<Utc>,
    ticks: &[RealTimeTick],
) -> Result<usize> {
    conn.transaction(|conn| {
        let mut written = 0;
        for tick in ticks {
            written += diesel::replace_into(realtime_ticks::table)
                .values(&TickRow::from_tick(observed_at, tick))
                .execute(conn)?;
        }
        Ok::<usize, diesel::result::Error>(written)
    })
    .map_err(|e| Error::Database(e.to_string()))
}

fn run_job<R>(conn: &mut SqliteConnection, statement: &str, kind: JobKind) -> Result<JobOutput<R>>
where
    R: QueryableByName<Sqlite> + 'static,
{
    let output = match kind {
        JobKind::Read => JobOutput::Rows(diesel::sql_query(statement).load::<R>(conn)?),
        JobKind::Write => JobOutput::Affected(diesel::sql_query(statement).execute(conn)?),
        JobKind::Procedure => JobOutput::Rows(
            conn.transaction(|conn| diesel::sql_query(statement).load::<R>(conn))?,
        ),
    };
    Ok(output)
}

impl PersistenceGateway for SqliteGateway {
    fn fetch_all_profiles(&self) -> Result<Vec<InstrumentProfile>> {
        let mut conn = self.conn()?;
        let rows: Vec<InstrumentRow> = instruments::table
            .order(instruments::code.asc())
            .select(InstrumentRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut profiles = Vec::with_capacity(rows.len());
        for row in rows {
            let code = row.code.clone();
            match InstrumentProfile::try_from(row) {
                Ok(profile) => profiles.push(profile),
                Err(e) => warn!(code = %code, error = %e, "Skipping malformed instrument row"),
            }
        }
        Ok(profiles)
    }

    fn fetch_historical_bars(&self, code: &InstrumentCode) -> Result<Vec<HistoricalBar>> {
        let mut conn = self.conn()?;
        let rows: Vec<BarRow> = historical_bars::table
            .filter(historical_bars::code.eq(code.as_str()))
            .order(historical_bars::trade_date.asc())
            .select(BarRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut bars = Vec::with_capacity(rows.len());
        for row in rows {
            let date = row.trade_date.clone();
            match HistoricalBar::try_from(row) {
                Ok(bar) => bars.push(bar),
                Err(e) => warn!(code = %code, date = %date, error = %e, "Skipping malformed bar row"),
            }
        }
        Ok(bars)
    }

    fn read_rows<R>(&self, query: &str) -> Result<Vec<R>>
    where
        R: QueryableByName<Sqlite> + 'static,
    {
        let mut conn = self.conn()?;
        diesel::sql_query(query)
            .load::<R>(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn write_statement(&self, statement: &str) -> Result<usize> {
        let mut conn = self.conn()?;
        diesel::sql_query(statement)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn execute_procedure<R>(&self, statement: &str) -> Result<Vec<R>>
    where
        R: QueryableByName<Sqlite> + 'static,
    {
        let mut conn = self.conn()?;
        conn.transaction(|conn| diesel::sql_query(statement).load::<R>(conn))
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn submit_async_job<R, F>(&self, statement: String, kind: JobKind, callback: F) -> bool
    where
        R: QueryableByName<Sqlite> + Send + 'static,
        F: FnOnce(Result<JobOutput<R>>) + Send + 'static,
    {
        let accepted = self.jobs.submit(Box::new(move |conn: Result<&mut SqliteConnection>| {
            let result = conn.and_then(|conn| run_job::<R>(conn, &statement, kind));
            if let Err(e) = &result {
                debug!(?kind, error = %e, "Async job failed");
            }
            callback(result);
        }));
        if !accepted {
            warn!(?kind, "Async job not accepted");
        }
        accepted
    }

    fn persist_ticks_async(
        &self,
        observed_at: DateTime<Utc>,
        ticks: Vec<RealTimeTick>,
        callback: PersistCallback,
    ) -> bool {
        self.jobs.submit(Box::new(move |conn: Result<&mut SqliteConnection>| {
            callback(conn.and_then(|conn| write_ticks(conn, observed_at, &ticks)));
        }))
    }

    fn persist_bars_async(
        &self,
        code: InstrumentCode,
        bars: Vec<HistoricalBar>,
        callback: PersistCallback,
    ) -> bool {
        self.jobs.submit(Box::new(move |conn: Result<&mut SqliteConnection>| {
            callback(conn.and_then(|conn| write_bars(conn, &code, &bars)));
        }))
    }

    fn purge_ticks_async(&self, callback: PersistCallback) -> bool {
        self.jobs.submit(Box::new(move |conn: Result<&mut SqliteConnection>| {
            callback(conn.and_then(|conn| {
                diesel::delete(realtime_ticks::table)
                    .execute(conn)
                    .map_err(|e| Error::Database(e.to_string()))
            }));
        }))
    }
}
