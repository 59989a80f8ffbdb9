//! Argument errors: caller mistakes caught before any engine call.

use super::error_code::{self, ErrorCode};

/// A malformed request. Always reported synchronously, even for async
/// entry points, because it is detected before anything is enqueued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{command}] {message}")]
pub struct ArgumentError {
    pub command: &'static str,
    pub message: String,
}

impl ArgumentError {
    pub fn new(command: &'static str, message: impl Into<String>) -> Self {
        Self {
            command,
            message: message.into(),
        }
    }
}

impl ErrorCode for ArgumentError {
    fn error_code(&self) -> &'static str {
        error_code::INVALID_ARGUMENT
    }
}
