//! Run one statement to completion and produce a connection-agnostic result.

use rusqlite::{Connection, Statement};
use sqlhost_core::errors::EngineError;
use sqlhost_core::types::{QueryResult, Row, Value};

use super::bind::{bind_params, column_meta};
use super::words::is_insert;

/// Compile, bind and run `sql`. The statement is finalized on return.
pub fn execute(conn: &Connection, sql: &str, params: &[Value]) -> Result<QueryResult, EngineError> {
    let mut stmt = conn.prepare(sql)?;
    run_statement(conn, &mut stmt, sql, params)
}

/// Like `execute`, but keeps the compiled statement in the connection's cache.
pub fn execute_cached(
    conn: &Connection,
    sql: &str,
    params: &[Value],
) -> Result<QueryResult, EngineError> {
    let mut stmt = conn.prepare_cached(sql)?;
    run_statement(conn, &mut stmt, sql, params)
}

/// Bind and step an already compiled statement. Leaves it reset and
/// ready to be bound again. `sql` is the text `stmt` was compiled from.
///
/// `insert_id` is reported only for an INSERT or REPLACE that changed rows.
pub fn run_statement(
    conn: &Connection,
    stmt: &mut Statement<'_>,
    sql: &str,
    params: &[Value],
) -> Result<QueryResult, EngineError> {
    bind_params(stmt, params)?;
    let columns = column_meta(stmt);
    let readonly = stmt.readonly();
    let before = if readonly { 0 } else { total_changes(conn)? };

    let mut rows = Vec::new();
    {
        let mut cursor = stmt.raw_query();
        while let Some(row) = cursor.next()? {
            let cells = (0..columns.len())
                .map(|idx| row.get_ref(idx).map(Value::from))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(Row::new(cells));
        }
    }

    let rows_affected = if readonly || total_changes(conn)? == before {
        0
    } else {
        conn.changes() as u64
    };
    let insert_id = (rows_affected > 0 && is_insert(sql)).then(|| conn.last_insert_rowid());

    Ok(QueryResult {
        rows_affected,
        insert_id,
        columns,
        rows,
    })
}

/// `sqlite3_changes` keeps its value across DDL, so a statement only
/// counts as changing rows when the running total moved.
fn total_changes(conn: &Connection) -> Result<u64, EngineError> {
    let total: i64 = conn
        .prepare_cached("SELECT total_changes()")?
        .query_row([], |row| row.get(0))?;
    Ok(total as u64)
}
