//! Tests for values, results and batch descriptions.

use sqlhost_core::types::*;

#[test]
fn test_value_conversions() {
    assert_eq!(Value::from(5_i64), Value::Integer(5));
    assert_eq!(Value::from(true), Value::Integer(1));
    assert_eq!(Value::from(1.5), Value::Real(1.5));
    assert_eq!(Value::from("hi"), Value::Text("hi".into()));
    assert_eq!(Value::from(vec![1_u8, 2]), Value::Blob(vec![1, 2]));
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
}

#[test]
fn test_value_accessors() {
    assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
    assert_eq!(Value::Real(3.0).as_i64(), None);
    assert_eq!(Value::Text("a".into()).as_str(), Some("a"));
    assert_eq!(Value::Blob(vec![9]).as_blob(), Some(&[9_u8][..]));
    assert!(Value::default().is_null());
    assert_eq!(Value::Blob(vec![]).type_name(), "blob");
}

#[test]
fn test_value_binds_through_rusqlite() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let values = [
        Value::Null,
        Value::Integer(-42),
        Value::Real(2.5),
        Value::Text("héllo".into()),
        Value::Blob(vec![0, 255, 7]),
    ];
    for value in values {
        let back: Value = conn
            .query_row("SELECT ?1", [&value], |row| Ok(Value::from(row.get_ref(0)?)))
            .unwrap();
        assert_eq!(back, value);
    }
}

#[test]
fn test_value_json_shape() {
    let json = serde_json::to_value(Value::Integer(1)).unwrap();
    assert_eq!(json, serde_json::json!({"type": "integer", "value": 1}));
    assert_eq!(Value::Real(f64::NAN).to_json(), serde_json::Value::Null);
}

#[test]
fn test_query_result_lookup_and_json() {
    let result = QueryResult {
        rows_affected: 0,
        insert_id: None,
        columns: vec![
            ColumnMeta::new("id", Some("INTEGER".into())),
            ColumnMeta::new("v", Some("TEXT".into())),
        ],
        rows: vec![
            Row::new(vec![Value::Integer(1), Value::Text("hi".into())]),
            Row::new(vec![Value::Integer(2), Value::Null]),
        ],
    };

    assert_eq!(result.row_count(), 2);
    assert_eq!(result.get(0, "v"), Some(&Value::Text("hi".into())));
    assert_eq!(result.get(1, "missing"), None);
    assert_eq!(
        result.rows_as_json(),
        serde_json::json!([{"id": 1, "v": "hi"}, {"id": 2, "v": null}])
    );

    let snapshot = result.first_snapshot().unwrap();
    assert_eq!(snapshot.get("id"), Some(&Value::Integer(1)));
    assert_eq!(snapshot.to_json(), serde_json::json!({"id": 1, "v": "hi"}));
}

#[test]
fn test_batch_param_sets() {
    assert_eq!(BatchCommand::new("SELECT 1").param_sets(), vec![&[] as &[Value]]);

    let single = BatchCommand::with_params("INSERT INTO t VALUES (?)", vec![Value::Integer(1)]);
    assert_eq!(single.param_sets().len(), 1);

    let many = BatchCommand::with_param_sets(
        "INSERT INTO t VALUES (?)",
        vec![vec![Value::Integer(1)], vec![Value::Integer(2)], vec![Value::Integer(3)]],
    );
    let sets = many.param_sets();
    assert_eq!(sets.len(), 3);
    assert_eq!(sets[2], &[Value::Integer(3)][..]);
}
