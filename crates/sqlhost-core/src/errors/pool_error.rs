//! Worker pool errors.

use super::error_code::{self, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("Worker pool is {state}, not accepting work")]
    NotRunning { state: &'static str },

    #[error("Failed to spawn worker thread: {message}")]
    Spawn { message: String },

    #[error("Task panicked on a worker thread: {message}")]
    WorkerPanic { message: String },
}

impl ErrorCode for PoolError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotRunning { .. } => error_code::POOL_NOT_RUNNING,
            Self::Spawn { .. } => error_code::POOL_SPAWN_FAILED,
            Self::WorkerPanic { .. } => error_code::WORKER_PANIC,
        }
    }
}
