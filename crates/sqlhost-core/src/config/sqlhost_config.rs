//! Top-level sqlhost configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{PoolConfig, StorageConfig};
use crate::constants::{JOURNAL_MODES, MAX_WORKERS, PROJECT_CONFIG_FILE};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`SQLHOST_*`)
/// 3. Project config (`sqlhost.toml` in the given root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SqlHostConfig {
    pub pool: PoolConfig,
    pub storage: StorageConfig,
}

/// Programmatic overrides, highest priority layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub workers: Option<usize>,
    pub base_path: Option<String>,
    pub busy_timeout_ms: Option<u64>,
}

impl SqlHostConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
            debug!(path = %project_config_path.display(), "merged project config");
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;
        debug!(
            workers = config.pool.effective_workers(),
            base_path = %config.storage.effective_base_path().display(),
            "configuration resolved"
        );

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &SqlHostConfig) -> Result<(), ConfigError> {
        if let Some(workers) = config.pool.workers {
            if !(1..=MAX_WORKERS).contains(&workers) {
                return Err(ConfigError::ValidationFailed {
                    field: "pool.workers".to_string(),
                    message: format!("must be between 1 and {MAX_WORKERS}"),
                });
            }
        }
        if let Some(ref mode) = config.storage.journal_mode {
            if !JOURNAL_MODES.iter().any(|m| m.eq_ignore_ascii_case(mode)) {
                return Err(ConfigError::ValidationFailed {
                    field: "storage.journal_mode".to_string(),
                    message: format!("unknown journal mode '{mode}'"),
                });
            }
        }
        if let Some(ref base) = config.storage.base_path {
            if base.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "storage.base_path".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut SqlHostConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: SqlHostConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values in `other` win.
    fn merge(base: &mut SqlHostConfig, other: &SqlHostConfig) {
        if other.pool.workers.is_some() {
            base.pool.workers = other.pool.workers;
        }

        if other.storage.base_path.is_some() {
            base.storage.base_path = other.storage.base_path.clone();
        }
        if other.storage.busy_timeout_ms.is_some() {
            base.storage.busy_timeout_ms = other.storage.busy_timeout_ms;
        }
        if other.storage.journal_mode.is_some() {
            base.storage.journal_mode = other.storage.journal_mode.clone();
        }
        if other.storage.foreign_keys.is_some() {
            base.storage.foreign_keys = other.storage.foreign_keys;
        }
    }

    /// Apply environment variable overrides.
    /// Unparseable values are ignored.
    fn apply_env_overrides(config: &mut SqlHostConfig) {
        if let Ok(val) = std::env::var("SQLHOST_WORKERS") {
            match val.parse::<usize>() {
                Ok(v) => config.pool.workers = Some(v),
                Err(_) => warn!(value = %val, "ignoring unparseable SQLHOST_WORKERS"),
            }
        }
        if let Ok(val) = std::env::var("SQLHOST_BASE_PATH") {
            config.storage.base_path = Some(val);
        }
        if let Ok(val) = std::env::var("SQLHOST_BUSY_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(v) => config.storage.busy_timeout_ms = Some(v),
                Err(_) => warn!(value = %val, "ignoring unparseable SQLHOST_BUSY_TIMEOUT_MS"),
            }
        }
    }

    fn apply_overrides(config: &mut SqlHostConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.workers {
            config.pool.workers = Some(v);
        }
        if let Some(ref v) = overrides.base_path {
            config.storage.base_path = Some(v.clone());
        }
        if let Some(v) = overrides.busy_timeout_ms {
            config.storage.busy_timeout_ms = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
