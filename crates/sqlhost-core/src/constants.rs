//! Shared constants for the sqlhost engine.

/// sqlhost version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Location marker that opens a private in-memory database.
pub const MEMORY_LOCATION: &str = ":memory:";

/// Lower bound applied to the auto-detected worker count.
pub const MIN_AUTO_WORKERS: usize = 2;

/// Upper bound applied to the auto-detected worker count.
pub const MAX_AUTO_WORKERS: usize = 8;

/// Hard ceiling for an explicitly configured worker count.
pub const MAX_WORKERS: usize = 64;

/// Default `busy_timeout` pragma in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Base directory used when none is configured.
pub const DEFAULT_BASE_PATH: &str = ".";

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "sqlhost.toml";

/// Journal modes accepted by the `journal_mode` pragma.
pub const JOURNAL_MODES: &[&str] = &["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];
