//! Lifecycle errors: operating on something that is not (or no longer) alive.

use super::error_code::{self, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Database '{name}' is not open")]
    NotOpen { name: String },

    #[error("Database '{name}' is already open")]
    AlreadyOpen { name: String },

    #[error("Connection '{name}' was closed while a statement handle was still held")]
    ConnectionClosed { name: String },

    #[error("Prepared statement has been finalized")]
    StatementFinalized,

    #[error("Database file not found: {path}")]
    FileNotFound { path: String },

    #[error("Runtime has been invalidated")]
    Invalidated,
}

impl ErrorCode for LifecycleError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotOpen { .. } => error_code::DB_NOT_OPEN,
            Self::AlreadyOpen { .. } => error_code::DB_ALREADY_OPEN,
            Self::ConnectionClosed { .. } => error_code::CONNECTION_CLOSED,
            Self::StatementFinalized => error_code::STATEMENT_FINALIZED,
            Self::FileNotFound { .. } => error_code::FILE_NOT_FOUND,
            Self::Invalidated => error_code::INVALIDATED,
        }
    }
}
