//! Storage configuration: where databases live and how connections are tuned.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BASE_PATH, DEFAULT_BUSY_TIMEOUT_MS};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory database names are resolved against. Default: ".".
    pub base_path: Option<String>,
    /// `busy_timeout` pragma in milliseconds. Default: 5000.
    pub busy_timeout_ms: Option<u64>,
    /// `journal_mode` pragma, applied only when set (e.g. "WAL").
    pub journal_mode: Option<String>,
    /// `foreign_keys` pragma, applied only when set.
    pub foreign_keys: Option<bool>,
}

impl StorageConfig {
    pub fn effective_base_path(&self) -> PathBuf {
        PathBuf::from(self.base_path.as_deref().unwrap_or(DEFAULT_BASE_PATH))
    }

    pub fn effective_busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS))
    }
}
