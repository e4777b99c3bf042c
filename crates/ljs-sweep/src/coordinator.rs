use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use ljs_core::errors::{ErrorInfo, SweepError};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Snapshot of the pool's job counters.
///
/// `queued + running + completed` always equals the number of jobs pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Jobs waiting for a worker.
    pub queued: usize,
    /// Jobs currently executing.
    pub running: usize,
    /// Jobs that reached a terminal state, successful or not.
    pub completed: usize,
    /// Subset of `completed` that returned an error or panicked.
    pub failed: usize,
}

impl PoolStatus {
    /// Number of jobs pushed so far.
    pub fn total(&self) -> usize {
        self.queued + self.running + self.completed
    }

    /// True once every pushed job is terminal.
    pub fn is_settled(&self) -> bool {
        self.completed == self.total()
    }
}

#[derive(Debug, Default)]
struct Counters {
    pushed: usize,
    started: usize,
    completed: usize,
    failed: usize,
}

impl Counters {
    fn status(&self) -> PoolStatus {
        PoolStatus {
            queued: self.pushed - self.started,
            running: self.started - self.completed,
            completed: self.completed,
            failed: self.failed,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    counters: Mutex<Counters>,
    settled: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs pushed jobs on a fixed number of worker threads.
///
/// Jobs never retry; an error or a panic is a terminal failure. Dropping the
/// coordinator blocks until every pushed job has finished.
pub struct Coordinator {
    pool: rayon::ThreadPool,
    shared: Arc<Shared>,
    thread_count: usize,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("thread_count", &self.thread_count)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Builds a pool with `thread_count` workers (at least one).
    pub fn new(thread_count: usize) -> Result<Self, SweepError> {
        let thread_count = thread_count.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .thread_name(|index| format!("ljs-worker-{index}"))
            .build()
            .map_err(|err| SweepError::Pool(ErrorInfo::new("thread_pool", err.to_string())))?;
        Ok(Self {
            pool,
            shared: Arc::new(Shared::default()),
            thread_count,
        })
    }

    /// Number of worker threads.
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Enqueues a job and returns immediately.
    pub fn push<F>(&self, job: F)
    where
        F: FnOnce() -> Result<(), SweepError> + Send + 'static,
    {
        self.shared.lock().pushed += 1;
        let shared = Arc::clone(&self.shared);
        self.pool.spawn(move || {
            shared.lock().started += 1;
            let failed = match panic::catch_unwind(AssertUnwindSafe(job)) {
                Ok(Ok(())) => false,
                Ok(Err(err)) => {
                    warn!(error = %err, "job failed");
                    true
                }
                Err(_) => {
                    warn!("job panicked");
                    true
                }
            };
            let mut counters = shared.lock();
            counters.completed += 1;
            if failed {
                counters.failed += 1;
            }
            drop(counters);
            shared.settled.notify_all();
        });
    }

    /// Current counters.
    pub fn status(&self) -> PoolStatus {
        self.shared.lock().status()
    }

    /// Blocks until every pushed job is terminal.
    pub fn wait(&self) -> PoolStatus {
        let mut counters = self.shared.lock();
        while counters.completed < counters.pushed {
            counters = self
                .shared
                .settled
                .wait(counters)
                .unwrap_or_else(PoisonError::into_inner);
        }
        counters.status()
    }

    /// Blocks like [`Coordinator::wait`], calling `report` with a fresh
    /// snapshot at least every `interval` and once more when settled.
    pub fn wait_with_progress<F>(&self, interval: Duration, mut report: F) -> PoolStatus
    where
        F: FnMut(PoolStatus),
    {
        loop {
            let status = self.status();
            report(status);
            if status.is_settled() {
                return status;
            }
            let counters = self.shared.lock();
            if counters.completed < counters.pushed {
                let _ = self
                    .shared
                    .settled
                    .wait_timeout(counters, interval)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.wait();
    }
}
