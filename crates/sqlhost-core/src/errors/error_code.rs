//! ErrorCode trait for host-facing error strings.

/// Every error enum implements this to give hosts a stable code string
/// alongside the human-readable message.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "CONSTRAINT_VIOLATION").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted host string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
pub const SQLITE_ERROR: &str = "SQLITE_ERROR";
pub const CONSTRAINT_VIOLATION: &str = "CONSTRAINT_VIOLATION";
pub const DB_BUSY: &str = "DB_BUSY";
pub const PARAMETER_COUNT: &str = "PARAMETER_COUNT";
pub const IO_ERROR: &str = "IO_ERROR";
pub const DB_NOT_OPEN: &str = "DB_NOT_OPEN";
pub const DB_ALREADY_OPEN: &str = "DB_ALREADY_OPEN";
pub const CONNECTION_CLOSED: &str = "CONNECTION_CLOSED";
pub const STATEMENT_FINALIZED: &str = "STATEMENT_FINALIZED";
pub const INVALIDATED: &str = "INVALIDATED";
pub const FILE_NOT_FOUND: &str = "FILE_NOT_FOUND";
pub const POOL_NOT_RUNNING: &str = "POOL_NOT_RUNNING";
pub const POOL_SPAWN_FAILED: &str = "POOL_SPAWN_FAILED";
pub const WORKER_PANIC: &str = "WORKER_PANIC";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
