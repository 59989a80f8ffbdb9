//! End-to-end tests for the `Runtime` command surface.

use std::time::Duration;

use serde_json::json;
use sqlhost_core::config::SqlHostConfig;
use sqlhost_core::errors::{ErrorCode, LifecycleError, SqlHostError};
use sqlhost_core::types::{BatchCommand, Value};
use sqlhost_engine::registry::pragmas::journal_mode;
use sqlhost_engine::{HostLoop, Runtime, WaitError};
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(5);

fn runtime() -> (Runtime, HostLoop, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SqlHostConfig::default();
    config.pool.workers = Some(2);
    config.storage.base_path = Some(dir.path().display().to_string());
    let (rt, host) = Runtime::install(config).unwrap();
    (rt, host, dir)
}

#[test]
fn test_insert_then_select_scenario() {
    let (rt, host, dir) = runtime();
    rt.open("t", None).unwrap();
    assert!(dir.path().join("t").exists());

    rt.execute("t", "CREATE TABLE a (id INTEGER PRIMARY KEY, v TEXT)", &[])
        .unwrap();
    let inserted = rt
        .execute_async("t", "INSERT INTO a (v) VALUES (?)", vec!["hi".into()])
        .unwrap()
        .wait(&host, WAIT)
        .unwrap();
    assert_eq!(inserted.rows_affected, 1);
    assert_eq!(inserted.insert_id, Some(1));

    let selected = rt
        .execute_async("t", "SELECT v FROM a", vec![])
        .unwrap()
        .wait(&host, WAIT)
        .unwrap();
    assert_eq!(selected.rows_as_json(), json!([{ "v": "hi" }]));
}

#[test]
fn test_async_engine_error_rejects_pending() {
    let (rt, host, _dir) = runtime();
    rt.open("t", Some(":memory:")).unwrap();

    let err = rt
        .execute_async("t", "SELECT * FROM missing", vec![])
        .unwrap()
        .wait(&host, WAIT)
        .unwrap_err();
    match err {
        WaitError::Rejected(err) => assert_eq!(err.error_code(), "SQLITE_ERROR"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn test_async_on_unknown_name_rejects_pending() {
    let (rt, host, _dir) = runtime();
    let err = rt
        .execute_async("ghost", "SELECT 1", vec![])
        .unwrap()
        .wait(&host, WAIT)
        .unwrap_err();
    assert!(matches!(
        err,
        WaitError::Rejected(SqlHostError::Lifecycle(LifecycleError::NotOpen { .. }))
    ));
}

#[test]
fn test_argument_errors_are_synchronous() {
    let (rt, _host, _dir) = runtime();
    rt.open("t", Some(":memory:")).unwrap();

    let err = rt.execute_async("t", "   ", vec![]).err().unwrap();
    assert!(matches!(err, SqlHostError::Argument(_)));
    assert_eq!(err.error_code(), "INVALID_ARGUMENT");

    let err = rt.execute_async("", "SELECT 1", vec![]).err().unwrap();
    assert!(matches!(err, SqlHostError::Argument(_)));

    let err = rt
        .execute_batch_async("t", vec![BatchCommand::new("")])
        .err()
        .unwrap();
    assert!(matches!(err, SqlHostError::Argument(_)));

    assert!(matches!(
        rt.load_file("t", "").err().unwrap(),
        SqlHostError::Argument(_)
    ));
    assert!(matches!(
        rt.open("bad\0name", None).unwrap_err(),
        SqlHostError::Argument(_)
    ));
}

#[test]
fn test_open_twice_and_close_unknown() {
    let (rt, _host, _dir) = runtime();
    rt.open("t", Some(":memory:")).unwrap();

    let err = rt.open("t", Some(":memory:")).unwrap_err();
    assert_eq!(err.error_code(), "DB_ALREADY_OPEN");

    rt.close("t").unwrap();
    let err = rt.close("t").unwrap_err();
    assert_eq!(err.error_code(), "DB_NOT_OPEN");
    let err = rt.execute("t", "SELECT 1", &[]).unwrap_err();
    assert_eq!(err.error_code(), "DB_NOT_OPEN");
}

#[test]
fn test_configured_journal_mode_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SqlHostConfig::default();
    config.storage.base_path = Some(dir.path().display().to_string());
    config.storage.journal_mode = Some("WAL".to_string());
    let (rt, _host) = Runtime::install(config).unwrap();

    rt.open("j", None).unwrap();
    rt.open("m", Some(":memory:")).unwrap();
    let mode_of = |name: &str| {
        rt.registry()
            .get(name)
            .unwrap()
            .with_conn(|conn| Ok(journal_mode(conn)?))
            .unwrap()
    };
    assert_eq!(mode_of("j"), "wal");
    assert_eq!(mode_of("m"), "memory");
}

#[test]
fn test_relative_location_nests_under_base() {
    let (rt, _host, dir) = runtime();
    rt.open("nested", Some("sub/dir")).unwrap();
    rt.execute("nested", "CREATE TABLE x (v)", &[]).unwrap();
    assert!(dir.path().join("sub").join("dir").join("nested").exists());
}

#[test]
fn test_data_survives_reopen() {
    let (rt, _host, _dir) = runtime();
    rt.open("p", None).unwrap();
    rt.execute("p", "CREATE TABLE x (v INTEGER)", &[]).unwrap();
    rt.execute("p", "INSERT INTO x VALUES (?)", &[Value::Integer(11)]).unwrap();
    rt.close("p").unwrap();

    rt.open("p", None).unwrap();
    let result = rt.execute("p", "SELECT v FROM x", &[]).unwrap();
    assert_eq!(result.get(0, "v"), Some(&Value::Integer(11)));
}

#[test]
fn test_attach_and_detach() {
    let (rt, _host, _dir) = runtime();
    rt.open("other", None).unwrap();
    rt.execute("other", "CREATE TABLE remote (v TEXT)", &[]).unwrap();
    rt.execute("other", "INSERT INTO remote VALUES ('there')", &[]).unwrap();
    rt.close("other").unwrap();

    rt.open("main_db", Some(":memory:")).unwrap();
    rt.attach("main_db", "other", "o", None).unwrap();
    let result = rt.execute("main_db", "SELECT v FROM o.remote", &[]).unwrap();
    assert_eq!(result.get(0, "v"), Some(&Value::Text("there".into())));

    rt.detach("main_db", "o").unwrap();
    assert!(rt.execute("main_db", "SELECT v FROM o.remote", &[]).is_err());
    assert!(rt.detach("main_db", "o").is_err());
}

#[test]
fn test_delete_removes_file_and_sidecars() {
    let (rt, _host, dir) = runtime();
    rt.open("gone", None).unwrap();
    rt.execute("gone", "CREATE TABLE x (v)", &[]).unwrap();

    let path = dir.path().join("gone");
    let sidecar = dir.path().join("gone-journal");
    std::fs::write(&sidecar, b"stale").unwrap();

    rt.delete("gone", None).unwrap();
    assert!(!path.exists());
    assert!(!sidecar.exists());
    assert!(!rt.registry().is_open("gone"));

    let err = rt.delete("gone", None).unwrap_err();
    assert_eq!(err.error_code(), "FILE_NOT_FOUND");
}

#[test]
fn test_delete_memory_database() {
    let (rt, _host, _dir) = runtime();
    rt.open("m", Some(":memory:")).unwrap();
    rt.delete("m", Some(":memory:")).unwrap();
    assert!(!rt.registry().is_open("m"));

    let err = rt.delete("m", Some(":memory:")).unwrap_err();
    assert!(matches!(err, SqlHostError::Argument(_)));
}

#[test]
fn test_batch_async_and_load_file() {
    let (rt, host, dir) = runtime();
    rt.open("t", Some(":memory:")).unwrap();

    let batch = rt
        .execute_batch_async(
            "t",
            vec![
                BatchCommand::new("CREATE TABLE n (v INTEGER)"),
                BatchCommand::with_param_sets(
                    "INSERT INTO n VALUES (?)",
                    vec![vec![1.into()], vec![2.into()]],
                ),
            ],
        )
        .unwrap()
        .wait(&host, WAIT)
        .unwrap();
    assert_eq!(batch.rows_affected, 2);

    let script = dir.path().join("seed.sql");
    std::fs::write(&script, "INSERT INTO n VALUES (3);\nINSERT INTO n VALUES (4);\n").unwrap();
    let loaded = rt.load_file("t", &script).unwrap().wait(&host, WAIT).unwrap();
    assert_eq!(loaded.commands, 2);

    let count = rt.execute("t", "SELECT COUNT(*) AS c FROM n", &[]).unwrap();
    assert_eq!(count.get(0, "c"), Some(&Value::Integer(4)));

    let err = rt
        .load_file("t", dir.path().join("absent.sql"))
        .unwrap()
        .wait(&host, WAIT)
        .unwrap_err();
    assert!(matches!(err, WaitError::Rejected(SqlHostError::Engine(_))));
}

#[test]
fn test_same_connection_results_in_submission_order() {
    let (rt, host, _dir) = runtime();
    rt.open("t", Some(":memory:")).unwrap();
    rt.execute("t", "CREATE TABLE seq (n INTEGER)", &[]).unwrap();

    let pendings: Vec<_> = (0..20)
        .map(|n| {
            rt.execute_async("t", "INSERT INTO seq VALUES (?)", vec![Value::Integer(n)])
                .unwrap()
        })
        .collect();
    for pending in &pendings {
        pending.wait(&host, WAIT).unwrap();
    }

    let result = rt.execute("t", "SELECT n FROM seq ORDER BY rowid", &[]).unwrap();
    let seen: Vec<i64> = result
        .rows
        .iter()
        .filter_map(|row| row.get(0).and_then(Value::as_i64))
        .collect();
    assert_eq!(seen, (0..20).collect::<Vec<_>>());
}

#[test]
fn test_clear_state_invalidates_then_reinstall_recovers() {
    let (rt, _host, _dir) = runtime();
    rt.open("t", Some(":memory:")).unwrap();

    rt.clear_state();
    assert!(rt.is_invalidated());
    let err = rt.open("t", Some(":memory:")).unwrap_err();
    assert!(matches!(err, SqlHostError::Lifecycle(LifecycleError::Invalidated)));
    assert_eq!(err.error_code(), "INVALIDATED");
    assert!(rt.execute_async("t", "SELECT 1", vec![]).is_err());

    rt.reinstall();
    assert!(!rt.is_invalidated());
    assert!(rt.registry().names().is_empty());
    rt.open("t", Some(":memory:")).unwrap();
    let one = rt.execute("t", "SELECT 1 AS one", &[]).unwrap();
    assert_eq!(one.get(0, "one"), Some(&Value::Integer(1)));
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = SqlHostConfig::default();
    config.pool.workers = Some(0);
    let err = Runtime::install(config).err().unwrap();
    assert!(matches!(err, SqlHostError::Config(_)));
}
