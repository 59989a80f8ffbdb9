//! Top-level error aggregating every concern via `From` conversions.

use super::error_code::ErrorCode;
use super::{ArgumentError, ConfigError, EngineError, LifecycleError, PoolError};

/// Error surfaced by every public entry point: raised synchronously or used
/// to reject an async `Pending`.
#[derive(Debug, thiserror::Error)]
pub enum SqlHostError {
    #[error("Argument error: {0}")]
    Argument(#[from] ArgumentError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<rusqlite::Error> for SqlHostError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Engine(err.into())
    }
}

impl ErrorCode for SqlHostError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Argument(e) => e.error_code(),
            Self::Engine(e) => e.error_code(),
            Self::Lifecycle(e) => e.error_code(),
            Self::Pool(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

pub type SqlHostResult<T> = Result<T, SqlHostError>;
