//! Worker pool configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_AUTO_WORKERS, MIN_AUTO_WORKERS};

/// Configuration for the worker pool.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of worker threads. Default: available parallelism clamped to 2..=8.
    pub workers: Option<usize>,
}

impl PoolConfig {
    /// Returns the effective worker count.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(MIN_AUTO_WORKERS)
                .clamp(MIN_AUTO_WORKERS, MAX_AUTO_WORKERS)
        })
    }
}
