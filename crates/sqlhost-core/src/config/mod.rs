//! Configuration system for sqlhost.
//! TOML-based, layered resolution: overrides > env > project > defaults.

pub mod pool_config;
pub mod sqlhost_config;
pub mod storage_config;

pub use pool_config::PoolConfig;
pub use sqlhost_config::{ConfigOverrides, SqlHostConfig};
pub use storage_config::StorageConfig;
