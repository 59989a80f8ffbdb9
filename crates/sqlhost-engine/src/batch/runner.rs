//! All-or-nothing execution of an ordered list of commands.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use sqlhost_core::errors::EngineError;
use sqlhost_core::types::{BatchCommand, BatchResult};
use tracing::debug;

use crate::query::run_statement;

/// Run `commands` in list order inside one IMMEDIATE transaction.
///
/// Each command compiles once and is re-bound per parameter set. The first
/// failure rolls the whole batch back and is returned; the count
/// accumulated so far is discarded.
pub fn execute_batch(conn: &Connection, commands: &[BatchCommand]) -> Result<BatchResult, EngineError> {
    execute_batch_with(conn, commands, |_| {})
}

/// `execute_batch` calling `after_statement` once per executed parameter
/// set, while the transaction is still open. This is the earliest point at
/// which the connection may be queried about what the statement did.
pub fn execute_batch_with<F>(
    conn: &Connection,
    commands: &[BatchCommand],
    mut after_statement: F,
) -> Result<BatchResult, EngineError>
where
    F: FnMut(&Connection),
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let mut rows_affected = 0_u64;

    for (idx, command) in commands.iter().enumerate() {
        let mut stmt = tx.prepare(&command.sql).map_err(|e| {
            debug!(command = idx, "batch command failed to compile");
            EngineError::from(e)
        })?;
        for params in command.param_sets() {
            let result = run_statement(&tx, &mut stmt, &command.sql, params)?;
            rows_affected += result.rows_affected;
            after_statement(&tx);
        }
    }

    tx.commit()?;
    Ok(BatchResult { rows_affected })
}
