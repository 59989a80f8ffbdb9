//! Fixed-size worker pool draining one shared FIFO queue.

pub mod worker_pool;

pub use worker_pool::{PoolState, WorkerPool};

use std::any::Any;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Lock, recovering the guard if a panicking job poisoned the mutex.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
