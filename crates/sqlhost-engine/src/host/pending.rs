//! Future-like handles for async entry points.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use sqlhost_core::errors::SqlHostError;
use sqlhost_core::SqlHostResult;

use super::HostLoop;

/// Longest single block on the host loop while waiting, so that a task
/// dropped by teardown is noticed without a host message.
const WAIT_SLICE: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    #[error("{0}")]
    Rejected(SqlHostError),

    /// The task was dropped by teardown and will never settle.
    #[error("Task was abandoned by runtime teardown")]
    Abandoned,

    #[error("Timed out waiting for result")]
    TimedOut,
}

/// Settles a `Pending`. Runs on the host thread as part of a delivery;
/// dropping it unsettled abandons the `Pending`.
pub struct Completer<T> {
    tx: Sender<SqlHostResult<T>>,
}

/// Result of an async entry point, settled on the host thread.
pub struct Pending<T> {
    rx: Receiver<SqlHostResult<T>>,
}

impl<T> Pending<T> {
    pub fn channel() -> (Completer<T>, Pending<T>) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        (Completer { tx }, Pending { rx })
    }

    /// True once the value has been delivered and not yet taken.
    pub fn is_settled(&self) -> bool {
        !self.rx.is_empty()
    }

    /// Take the settled value without pumping the host loop.
    pub fn try_take(&self) -> Option<SqlHostResult<T>> {
        self.rx.try_recv().ok()
    }

    /// Pump `host` until the value arrives, the task is abandoned, or
    /// `timeout` elapses. Other queued deliveries run along the way.
    pub fn wait(&self, host: &HostLoop, timeout: Duration) -> Result<T, WaitError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.rx.try_recv() {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(err)) => return Err(WaitError::Rejected(err)),
                Err(TryRecvError::Disconnected) => return Err(WaitError::Abandoned),
                Err(TryRecvError::Empty) => {}
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(WaitError::TimedOut);
            }
            host.run_for((deadline - now).min(WAIT_SLICE));
        }
    }
}

impl<T> Completer<T> {
    pub fn resolve(self, value: T) {
        self.settle(Ok(value));
    }

    pub fn reject(self, err: SqlHostError) {
        self.settle(Err(err));
    }

    pub fn settle(self, result: SqlHostResult<T>) {
        let _ = self.tx.send(result);
    }
}
