//! Tests for the sqlhost configuration system.

use std::sync::Mutex;

use sqlhost_core::config::{ConfigOverrides, SqlHostConfig};
use sqlhost_core::constants::{DEFAULT_BUSY_TIMEOUT_MS, MAX_AUTO_WORKERS, MIN_AUTO_WORKERS};
use sqlhost_core::errors::ConfigError;

/// Serializes tests that touch environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

fn clear_sqlhost_env_vars() {
    for key in ["SQLHOST_WORKERS", "SQLHOST_BASE_PATH", "SQLHOST_BUSY_TIMEOUT_MS"] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_sqlhost_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("sqlhost.toml"),
        r#"
[pool]
workers = 3

[storage]
base_path = "/from/project"
busy_timeout_ms = 100
journal_mode = "wal"
"#,
    )
    .unwrap();

    std::env::set_var("SQLHOST_BUSY_TIMEOUT_MS", "250");
    std::env::set_var("SQLHOST_BASE_PATH", "/from/env");

    let overrides = ConfigOverrides {
        base_path: Some("/from/overrides".into()),
        ..Default::default()
    };
    let config = SqlHostConfig::load(dir.path(), Some(&overrides)).unwrap();

    // Project only
    assert_eq!(config.pool.workers, Some(3));
    assert_eq!(config.storage.journal_mode.as_deref(), Some("wal"));
    // Env beats project
    assert_eq!(config.storage.busy_timeout_ms, Some(250));
    // Overrides beat env
    assert_eq!(config.storage.base_path.as_deref(), Some("/from/overrides"));

    clear_sqlhost_env_vars();
}

#[test]
fn test_missing_project_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_sqlhost_env_vars();

    let dir = tempdir();
    let config = SqlHostConfig::load(dir.path(), None).unwrap();

    assert!(config.pool.workers.is_none());
    let workers = config.pool.effective_workers();
    assert!((MIN_AUTO_WORKERS..=MAX_AUTO_WORKERS).contains(&workers));
    assert_eq!(
        config.storage.effective_busy_timeout().as_millis() as u64,
        DEFAULT_BUSY_TIMEOUT_MS
    );
    assert_eq!(config.storage.effective_base_path(), std::path::PathBuf::from("."));
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_sqlhost_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("sqlhost.toml"), "[pool\nworkers = ").unwrap();

    let err = SqlHostConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_unparseable_env_value_is_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_sqlhost_env_vars();

    std::env::set_var("SQLHOST_WORKERS", "lots");
    let dir = tempdir();
    let config = SqlHostConfig::load(dir.path(), None).unwrap();
    assert!(config.pool.workers.is_none());

    clear_sqlhost_env_vars();
}

#[test]
fn test_validate_rejects_worker_bounds() {
    let zero = SqlHostConfig::from_toml("[pool]\nworkers = 0").unwrap();
    let err = SqlHostConfig::validate(&zero).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "pool.workers"));

    let huge = SqlHostConfig::from_toml("[pool]\nworkers = 65").unwrap();
    assert!(SqlHostConfig::validate(&huge).is_err());

    let ok = SqlHostConfig::from_toml("[pool]\nworkers = 64").unwrap();
    assert!(SqlHostConfig::validate(&ok).is_ok());
    assert_eq!(ok.pool.effective_workers(), 64);
}

#[test]
fn test_validate_rejects_unknown_journal_mode() {
    let config = SqlHostConfig::from_toml("[storage]\njournal_mode = \"fancy\"").unwrap();
    let err = SqlHostConfig::validate(&config).unwrap_err();
    assert!(
        matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "storage.journal_mode")
    );

    let config = SqlHostConfig::from_toml("[storage]\njournal_mode = \"Truncate\"").unwrap();
    assert!(SqlHostConfig::validate(&config).is_ok());
}

#[test]
fn test_overrides_are_validated() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_sqlhost_env_vars();

    let dir = tempdir();
    let overrides = ConfigOverrides {
        workers: Some(0),
        ..Default::default()
    };
    assert!(SqlHostConfig::load(dir.path(), Some(&overrides)).is_err());
}

#[test]
fn test_unknown_keys_ignored() {
    let config = SqlHostConfig::from_toml(
        r#"
[pool]
workers = 2
future_knob = true

[something_else]
x = 1
"#,
    )
    .unwrap();
    assert_eq!(config.pool.workers, Some(2));
}

#[test]
fn test_toml_round_trip_keeps_values() {
    let config = SqlHostConfig::from_toml(
        "[storage]\nbase_path = \"/data\"\nforeign_keys = true\n",
    )
    .unwrap();
    let text = config.to_toml().unwrap();
    let back = SqlHostConfig::from_toml(&text).unwrap();
    assert_eq!(back.storage.base_path.as_deref(), Some("/data"));
    assert_eq!(back.storage.foreign_keys, Some(true));
}
