//! Caller-owned prepared statements.
//!
//! The compiled statement lives in the connection's statement cache; the
//! handle keeps the SQL text, the bound parameters and a weak reference to
//! its connection. Each execution runs the cached statement to completion
//! and buffers the rows that `step` then hands out one at a time.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use sqlhost_core::errors::{EngineError, LifecycleError};
use sqlhost_core::traits::CancellationToken;
use sqlhost_core::types::{ColumnMeta, Row, Value};
use sqlhost_core::SqlHostResult;

use crate::hooks::HookDispatcher;
use crate::query::{bind, run_statement};
use crate::registry::ConnectionEntry;

pub struct PreparedStatement {
    connection: String,
    entry: Weak<ConnectionEntry>,
    dispatcher: HookDispatcher,
    generation: CancellationToken,
    sql: String,
    parameter_count: usize,
    columns: Vec<ColumnMeta>,
    params: Vec<Value>,
    /// Rows of the current execution; `None` until the next `step` runs it.
    pending: Option<VecDeque<Row>>,
    rows_affected: u64,
    insert_id: Option<i64>,
    finalized: bool,
}

impl PreparedStatement {
    /// Compile `sql` on `entry`. Syntax errors surface here.
    pub(crate) fn prepare(
        entry: &Arc<ConnectionEntry>,
        dispatcher: HookDispatcher,
        generation: CancellationToken,
        sql: &str,
    ) -> SqlHostResult<Self> {
        let (parameter_count, columns) = entry.with_conn(|conn| {
            let stmt = conn.prepare_cached(sql).map_err(EngineError::from)?;
            Ok((stmt.parameter_count(), bind::column_meta(&stmt)))
        })?;
        Ok(Self {
            connection: entry.name().to_string(),
            entry: Arc::downgrade(entry),
            dispatcher,
            generation,
            sql: sql.to_string(),
            parameter_count,
            columns,
            params: Vec::new(),
            pending: None,
            rows_affected: 0,
            insert_id: None,
            finalized: false,
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn connection(&self) -> &str {
        &self.connection
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Rows changed by the most recent execution.
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    pub fn insert_id(&self) -> Option<i64> {
        self.insert_id
    }

    /// Replace the bound parameters. Implies `reset`.
    pub fn bind(&mut self, params: Vec<Value>) -> SqlHostResult<()> {
        self.live_entry()?;
        if params.len() != self.parameter_count {
            return Err(EngineError::ParameterCount {
                expected: self.parameter_count,
                actual: params.len(),
            }
            .into());
        }
        self.params = params;
        self.pending = None;
        Ok(())
    }

    /// Next result row, or `None` once the results are exhausted. The
    /// first step after `bind`/`reset` executes the statement; stepping
    /// past the end keeps returning `None` until the next `reset`.
    pub fn step(&mut self) -> SqlHostResult<Option<Row>> {
        let entry = self.live_entry()?;
        if self.pending.is_none() {
            let result = self.dispatcher.run(&entry, &self.generation, |conn, _| {
                let mut stmt = conn.prepare_cached(&self.sql)?;
                run_statement(conn, &mut stmt, &self.sql, &self.params)
            })?;
            self.rows_affected = result.rows_affected;
            self.insert_id = result.insert_id;
            self.pending = Some(result.rows.into());
        }
        Ok(self.pending.as_mut().and_then(VecDeque::pop_front))
    }

    /// Rewind so the next `step` executes again with the same bindings.
    pub fn reset(&mut self) -> SqlHostResult<()> {
        self.live_entry()?;
        self.pending = None;
        Ok(())
    }

    /// Release the handle. Safe to call any number of times, including
    /// after the connection closed.
    pub fn finalize(&mut self) {
        self.finalized = true;
        self.pending = None;
        self.params.clear();
        self.entry = Weak::new();
    }

    fn live_entry(&self) -> SqlHostResult<Arc<ConnectionEntry>> {
        if self.finalized {
            return Err(LifecycleError::StatementFinalized.into());
        }
        match self.entry.upgrade() {
            Some(entry) if entry.is_open() => Ok(entry),
            _ => Err(LifecycleError::ConnectionClosed {
                name: self.connection.clone(),
            }
            .into()),
        }
    }
}
