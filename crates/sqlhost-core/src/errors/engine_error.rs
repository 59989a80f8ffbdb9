//! Engine errors: failures reported by SQLite while executing work.

use rusqlite::ErrorCode as SqliteCode;

use super::error_code::{self, ErrorCode};

/// Expected runtime failures from the embedded engine. These are returned
/// as the failure half of a result and never take down a worker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("{code}: {message}")]
    Sqlite {
        /// Primary result code name, e.g. `SQLITE_CONSTRAINT`.
        code: &'static str,
        extended_code: i32,
        message: String,
    },

    #[error("Statement expects {expected} parameters but {actual} were bound")]
    ParameterCount { expected: usize, actual: usize },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl EngineError {
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// True for `SQLITE_CONSTRAINT` failures (unique, not null, check, foreign key).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Sqlite { code: "SQLITE_CONSTRAINT", .. })
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Self::Sqlite {
                code: "SQLITE_BUSY" | "SQLITE_LOCKED",
                ..
            }
        )
    }
}

impl ErrorCode for EngineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } if self.is_constraint_violation() => error_code::CONSTRAINT_VIOLATION,
            Self::Sqlite { .. } if self.is_busy() => error_code::DB_BUSY,
            Self::Sqlite { .. } => error_code::SQLITE_ERROR,
            Self::ParameterCount { .. } => error_code::PARAMETER_COUNT,
            Self::Io { .. } => error_code::IO_ERROR,
        }
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, message) => Self::Sqlite {
                code: code_name(failure.code),
                extended_code: failure.extended_code,
                message: message.unwrap_or_else(|| failure.to_string()),
            },
            rusqlite::Error::InvalidParameterCount(actual, expected) => {
                Self::ParameterCount { expected, actual }
            }
            other => Self::Sqlite {
                code: "SQLITE_ERROR",
                extended_code: rusqlite::ffi::SQLITE_ERROR,
                message: other.to_string(),
            },
        }
    }
}

/// Maps rusqlite's primary code onto the C API constant name.
fn code_name(code: SqliteCode) -> &'static str {
    match code {
        SqliteCode::InternalMalfunction => "SQLITE_INTERNAL",
        SqliteCode::PermissionDenied => "SQLITE_PERM",
        SqliteCode::OperationAborted => "SQLITE_ABORT",
        SqliteCode::DatabaseBusy => "SQLITE_BUSY",
        SqliteCode::DatabaseLocked => "SQLITE_LOCKED",
        SqliteCode::OutOfMemory => "SQLITE_NOMEM",
        SqliteCode::ReadOnly => "SQLITE_READONLY",
        SqliteCode::OperationInterrupted => "SQLITE_INTERRUPT",
        SqliteCode::SystemIoFailure => "SQLITE_IOERR",
        SqliteCode::DatabaseCorrupt => "SQLITE_CORRUPT",
        SqliteCode::NotFound => "SQLITE_NOTFOUND",
        SqliteCode::DiskFull => "SQLITE_FULL",
        SqliteCode::CannotOpen => "SQLITE_CANTOPEN",
        SqliteCode::FileLockingProtocolFailed => "SQLITE_PROTOCOL",
        SqliteCode::SchemaChanged => "SQLITE_SCHEMA",
        SqliteCode::TooBig => "SQLITE_TOOBIG",
        SqliteCode::ConstraintViolation => "SQLITE_CONSTRAINT",
        SqliteCode::TypeMismatch => "SQLITE_MISMATCH",
        SqliteCode::ApiMisuse => "SQLITE_MISUSE",
        SqliteCode::NoLargeFileSupport => "SQLITE_NOLFS",
        SqliteCode::AuthorizationForStatementDenied => "SQLITE_AUTH",
        SqliteCode::ParameterOutOfRange => "SQLITE_RANGE",
        SqliteCode::NotADatabase => "SQLITE_NOTADB",
        _ => "SQLITE_ERROR",
    }
}
