//! Error handling for sqlhost.
//! One error enum per concern, `thiserror` only, zero `anyhow`.

pub mod argument_error;
pub mod config_error;
pub mod engine_error;
pub mod error_code;
pub mod lifecycle_error;
pub mod pool_error;
pub mod sqlhost_error;

pub use argument_error::ArgumentError;
pub use config_error::ConfigError;
pub use engine_error::EngineError;
pub use error_code::ErrorCode;
pub use lifecycle_error::LifecycleError;
pub use pool_error::PoolError;
pub use sqlhost_error::{SqlHostError, SqlHostResult};
