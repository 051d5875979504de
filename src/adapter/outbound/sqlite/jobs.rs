//! Asynchronous job queue for the SQLite gateway.
//!
//! Jobs are type-erased closures pushed onto a bounded channel and drained
//! by a single worker thread, so they run in submission order. Each job is
//! handed a pooled connection, or the error that prevented getting one, and
//! is responsible for invoking its own callback exactly once.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle, ThreadId};

use diesel::SqliteConnection;
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::database::{configure_sqlite_connection, DbPool};
use crate::error::{Error, Result};

/// A unit of work executed on the worker thread.
pub type Task = Box<dyn FnOnce(Result<&mut SqliteConnection>) + Send + 'static>;

/// Bounded FIFO queue drained by one worker thread.
pub struct JobQueue {
    tx: RwLock<Option<mpsc::Sender<Task>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
}

impl JobQueue {
    /// Spawn the worker thread.
    ///
    /// # Errors
    /// Returns an error if the thread cannot be spawned.
    pub fn start(pool: DbPool, capacity: usize, busy_timeout_ms: u64) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<Task>(capacity);
        let worker = thread::Builder::new()
            .name("sharecache-jobs".into())
            .spawn(move || run_worker(pool, rx, busy_timeout_ms))?;

        info!(capacity, "Job queue started");
        Ok(Self {
            tx: RwLock::new(Some(tx)),
            worker_id: worker.thread().id(),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Enqueue a task without blocking.
    ///
    /// Returns false if the queue is full or has been shut down; the task
    /// is dropped without running in that case.
    pub fn submit(&self, task: Task) -> bool {
        let guard = self.tx.read();
        let Some(tx) = guard.as_ref() else {
            warn!("Job rejected, queue is shut down");
            return false;
        };
        match tx.try_send(task) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Job rejected, queue is full");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Job rejected, worker has stopped");
                false
            }
        }
    }

    /// Stop accepting jobs, let the worker drain what is queued, and join it.
    ///
    /// Called from the worker itself (a job dropping the last handle), the
    /// worker is detached instead and exits once the queue is empty.
    pub fn shutdown(&self) {
        drop(self.tx.write().take());
        if thread::current().id() == self.worker_id {
            debug!("Job queue shut down from its worker, not joining");
            drop(self.worker.lock().take());
            return;
        }
        if let Some(worker) = self.worker.lock().take() {
            if worker.join().is_err() {
                warn!("Job worker panicked");
            }
            info!("Job queue drained");
        }
    }
}

impl Drop for JobQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(pool: DbPool, mut rx: mpsc::Receiver<Task>, busy_timeout_ms: u64) {
    let mut completed: u64 = 0;
    let mut panicked: u64 = 0;
    while let Some(task) = rx.blocking_recv() {
        // A panicking job must not take the queued ones down with it.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| match pool.get() {
            Ok(mut conn) => {
                if let Err(e) = configure_sqlite_connection(&mut conn, busy_timeout_ms) {
                    warn!(error = %e, "Failed to configure SQLite connection");
                }
                task(Ok(&mut *conn));
            }
            Err(e) => task(Err(Error::Connection(e.to_string()))),
        }));
        if outcome.is_err() {
            panicked += 1;
            warn!(panicked, "Job panicked, continuing with the next one");
        }
        completed += 1;
    }
    debug!(completed, panicked, "Job worker exiting");
}
