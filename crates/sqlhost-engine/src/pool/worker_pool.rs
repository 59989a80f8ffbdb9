//! Worker pool with restart support for teardown.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use sqlhost_core::errors::PoolError;
use tracing::{debug, error, info, warn};

use super::{lock, panic_message};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Lifecycle of the pool. `restart` walks `Running -> Draining -> Stopped -> Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    Running,
    Draining,
    Stopped,
}

impl PoolState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed set of named worker threads sharing one unbounded FIFO queue.
///
/// Workers run each job under `catch_unwind`; a panicking job is logged
/// and never takes its worker down. Jobs dequeued while the pool is not
/// `Running` are dropped unexecuted.
pub struct WorkerPool {
    size: usize,
    state: Arc<Mutex<PoolState>>,
    sender: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Spawn `size` workers (at least one).
    pub fn new(size: usize) -> Result<Self, PoolError> {
        let pool = Self {
            size: size.max(1),
            state: Arc::new(Mutex::new(PoolState::Stopped)),
            sender: Mutex::new(None),
            workers: Mutex::new(Vec::new()),
        };
        pool.start()?;
        Ok(pool)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn state(&self) -> PoolState {
        *lock(&self.state)
    }

    /// Append a job to the queue and wake one idle worker.
    pub fn queue_work<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let state = self.state();
        if state != PoolState::Running {
            warn!(%state, "worker pool rejected work");
            return Err(PoolError::NotRunning {
                state: state.as_str(),
            });
        }
        let sender = lock(&self.sender);
        match sender.as_ref() {
            Some(tx) => tx.send(Box::new(job)).map_err(|_| PoolError::NotRunning {
                state: PoolState::Stopped.as_str(),
            }),
            None => Err(PoolError::NotRunning {
                state: PoolState::Stopped.as_str(),
            }),
        }
    }

    /// Stop accepting work, let running jobs finish, discard queued jobs,
    /// join every worker and spawn a fresh set.
    pub fn restart(&self) -> Result<(), PoolError> {
        let discarded = self.stop();
        info!(discarded, "worker pool restarting");
        self.start()
    }

    /// Stop the pool for good. Queued jobs are discarded.
    pub fn shutdown(&self) {
        let discarded = self.stop();
        debug!(discarded, "worker pool shut down");
    }

    fn start(&self) -> Result<(), PoolError> {
        let (tx, rx) = crossbeam_channel::unbounded::<Job>();
        let mut workers = lock(&self.workers);
        for n in 0..self.size {
            let rx = rx.clone();
            let state = self.state.clone();
            let handle = thread::Builder::new()
                .name(format!("sqlhost-worker-{n}"))
                .spawn(move || worker_loop(rx, state))
                .map_err(|e| PoolError::Spawn {
                    message: e.to_string(),
                })?;
            workers.push(handle);
        }
        *lock(&self.sender) = Some(tx);
        *lock(&self.state) = PoolState::Running;
        debug!(size = self.size, "worker pool running");
        Ok(())
    }

    /// Returns the number of jobs discarded from the queue.
    fn stop(&self) -> usize {
        *lock(&self.state) = PoolState::Draining;
        let discarded = lock(&self.sender).take().map_or(0, |tx| tx.len());

        let handles: Vec<_> = lock(&self.workers).drain(..).collect();
        let current = thread::current().id();
        for handle in handles {
            // A worker cannot join itself; it exits on its own once the queue disconnects.
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                error!("worker thread terminated abnormally");
            }
        }
        *lock(&self.state) = PoolState::Stopped;
        discarded
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(rx: Receiver<Job>, state: Arc<Mutex<PoolState>>) {
    while let Ok(job) = rx.recv() {
        if *lock(&state) != PoolState::Running {
            drop(job);
            continue;
        }
        if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
            error!(panic = %panic_message(&*panic), "job panicked on worker thread");
        }
    }
}
