//! Tracked detached tasks
//!
//! Cache writes after a network fetch never delay the response, but they
//! are kept in a `JoinSet` so callers can wait for them before exiting.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use tokio::task::{JoinError, JoinSet};
use tracing::warn;

/// Set of fire-and-forget tasks that can still be awaited
///
/// Tasks still running when this is dropped are aborted.
#[derive(Debug, Default)]
pub struct BackgroundTasks {
    inner: Mutex<Tracked>,
}

#[derive(Debug, Default)]
struct Tracked {
    set: JoinSet<()>,
    /// Tasks joined on spawn since the last settle
    reaped: usize,
}

impl Tracked {
    fn reap_finished(&mut self) {
        while let Some(result) = self.set.try_join_next() {
            log_failure(result);
            self.reaped += 1;
        }
    }
}

fn log_failure(result: Result<(), JoinError>) {
    if let Err(e) = result {
        warn!("Background task failed: {}", e);
    }
}

impl BackgroundTasks {
    /// Create an empty task set
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task onto the current runtime, joining any that already
    /// finished so an embedder that never settles does not accumulate them
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tracked = self.lock();
        tracked.reap_finished();
        tracked.set.spawn(task);
    }

    /// Number of tasks not yet awaited
    pub fn pending(&self) -> usize {
        self.lock().set.len()
    }

    /// Wait for every spawned task, including ones spawned while waiting.
    /// Returns how many tasks finished since the previous settle.
    pub async fn settle(&self) -> usize {
        let mut finished = 0;
        loop {
            let mut set = {
                let mut tracked = self.lock();
                finished += std::mem::take(&mut tracked.reaped);
                std::mem::take(&mut tracked.set)
            };
            if set.is_empty() {
                return finished;
            }
            while let Some(result) = set.join_next().await {
                log_failure(result);
                finished += 1;
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tracked> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
