//! Tests for the sqlhost error handling system.

use std::collections::HashSet;

use sqlhost_core::errors::error_code::{self, ErrorCode};
use sqlhost_core::errors::*;

#[test]
fn test_all_errors_have_error_code() {
    let argument = ArgumentError::new("execute", "missing sql");
    assert_eq!(argument.error_code(), error_code::INVALID_ARGUMENT);

    let engine = EngineError::ParameterCount { expected: 2, actual: 1 };
    assert_eq!(engine.error_code(), error_code::PARAMETER_COUNT);

    let lifecycle = LifecycleError::StatementFinalized;
    assert_eq!(lifecycle.error_code(), error_code::STATEMENT_FINALIZED);

    let pool = PoolError::NotRunning { state: "draining" };
    assert_eq!(pool.error_code(), error_code::POOL_NOT_RUNNING);

    let config = ConfigError::FileNotFound { path: "/tmp".into() };
    assert_eq!(config.error_code(), error_code::CONFIG_ERROR);
}

#[test]
fn test_lifecycle_codes_are_distinct() {
    let codes: HashSet<&str> = [
        LifecycleError::NotOpen { name: "a".into() }.error_code(),
        LifecycleError::AlreadyOpen { name: "a".into() }.error_code(),
        LifecycleError::ConnectionClosed { name: "a".into() }.error_code(),
        LifecycleError::StatementFinalized.error_code(),
        LifecycleError::FileNotFound { path: "a".into() }.error_code(),
        LifecycleError::Invalidated.error_code(),
    ]
    .into_iter()
    .collect();
    assert_eq!(codes.len(), 6);
}

#[test]
fn test_from_conversions() {
    let err: SqlHostError = LifecycleError::NotOpen { name: "t".into() }.into();
    assert!(matches!(err, SqlHostError::Lifecycle(LifecycleError::NotOpen { .. })));

    let err: SqlHostError = PoolError::WorkerPanic { message: "boom".into() }.into();
    assert!(matches!(err, SqlHostError::Pool(PoolError::WorkerPanic { .. })));

    let err: SqlHostError = ArgumentError::new("open", "bad name").into();
    assert_eq!(err.error_code(), error_code::INVALID_ARGUMENT);
}

#[test]
fn test_coded_string_format() {
    let err = LifecycleError::NotOpen { name: "main".into() };
    assert_eq!(err.coded_string(), "[DB_NOT_OPEN] Database 'main' is not open");

    let wrapped: SqlHostError = err.into();
    assert!(wrapped.coded_string().starts_with("[DB_NOT_OPEN] "));
}

#[test]
fn test_rusqlite_constraint_maps_to_primary_code() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT NOT NULL UNIQUE)")
        .unwrap();
    conn.execute("INSERT INTO t (v) VALUES ('a')", []).unwrap();
    let raw = conn.execute("INSERT INTO t (v) VALUES ('a')", []).unwrap_err();

    let err = EngineError::from(raw);
    assert!(err.is_constraint_violation());
    assert_eq!(err.error_code(), error_code::CONSTRAINT_VIOLATION);
    match err {
        EngineError::Sqlite { code, message, .. } => {
            assert_eq!(code, "SQLITE_CONSTRAINT");
            assert!(message.contains("UNIQUE"), "message was {message}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_rusqlite_syntax_error_maps_to_sqlite_error() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let raw = conn.prepare("SELEC 1").unwrap_err();
    let err: SqlHostError = raw.into();
    assert_eq!(err.error_code(), error_code::SQLITE_ERROR);
    assert!(matches!(err, SqlHostError::Engine(EngineError::Sqlite { code: "SQLITE_ERROR", .. })));
}

#[test]
fn test_io_error_carries_path() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = EngineError::io("/db/x", &io);
    assert_eq!(err.error_code(), error_code::IO_ERROR);
    assert!(err.to_string().contains("/db/x"));
}
