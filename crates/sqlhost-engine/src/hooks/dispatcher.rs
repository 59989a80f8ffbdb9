//! Drains a connection's journal onto the host channel.

use std::sync::Arc;

use rusqlite::Connection;
use sqlhost_core::errors::EngineError;
use sqlhost_core::events::{
    CommitEvent, HookEvent, HookHandler, HookKind, RollbackEvent, UpdateEvent, UpdateOperation,
};
use sqlhost_core::traits::{Cancellable, CancellationToken};
use sqlhost_core::types::{RowSnapshot, Value};
use sqlhost_core::SqlHostResult;
use tracing::{debug, trace};

use super::journal::JournalRecord;
use super::trampoline;
use crate::host::HostSender;
use crate::query;
use crate::registry::ConnectionEntry;

#[derive(Clone)]
pub struct HookDispatcher {
    host: HostSender,
}

impl HookDispatcher {
    pub fn new(host: HostSender) -> Self {
        Self { host }
    }

    /// Register `handler` for `kind`, or deregister with `None`.
    /// Deregistering an empty slot is a no-op.
    pub fn register(
        &self,
        entry: &ConnectionEntry,
        kind: HookKind,
        handler: Option<Arc<dyn HookHandler>>,
    ) -> SqlHostResult<()> {
        entry.with_conn(|conn| {
            match handler {
                Some(handler) => {
                    entry.set_handler(kind, Some(handler));
                    trampoline::install(conn, kind, entry.journal());
                    debug!(connection = %entry.name(), %kind, "hook registered");
                }
                None => {
                    if entry.set_handler(kind, None).is_some() {
                        trampoline::uninstall(conn, kind);
                        entry.journal().discard(kind);
                        debug!(connection = %entry.name(), %kind, "hook deregistered");
                    }
                }
            }
            Ok(())
        })
    }

    /// Run one engine call on `entry` and flush its hook events afterwards,
    /// whether the call succeeded or not. Calls that run several statements
    /// report each one through the `StatementTap` so row images match the
    /// moment of each event.
    pub fn run<T, F>(
        &self,
        entry: &ConnectionEntry,
        generation: &CancellationToken,
        f: F,
    ) -> SqlHostResult<T>
    where
        F: FnOnce(&Connection, &StatementTap<'_>) -> Result<T, EngineError>,
    {
        entry.with_conn(|conn| {
            let tap = StatementTap {
                dispatcher: self,
                entry,
            };
            let outcome = f(conn, &tap);
            self.flush(entry, conn, generation);
            Ok(outcome?)
        })
    }

    /// Turn everything journaled since the last capture into events, reading
    /// back post-images now. Must run between statements: the engine forbids
    /// queries from inside its callbacks.
    pub fn capture(&self, entry: &ConnectionEntry, conn: &Connection) {
        let records = entry.journal().drain();
        if records.is_empty() {
            return;
        }
        let events: Vec<HookEvent> = records
            .into_iter()
            .filter(|record| entry.handler(record.kind()).is_some())
            .map(|record| self.materialize(entry.name(), conn, record))
            .collect();
        entry.journal().stage(events);
    }

    /// Capture what is left, then post every staged event to the host, in
    /// order. Returns how many were posted.
    pub fn flush(
        &self,
        entry: &ConnectionEntry,
        conn: &Connection,
        generation: &CancellationToken,
    ) -> usize {
        self.capture(entry, conn);
        let events = entry.journal().take_staged();
        if events.is_empty() || generation.is_cancelled() {
            return 0;
        }

        let mut posted = 0;
        for event in events {
            let Some(handler) = entry.handler(event.kind()) else {
                continue;
            };
            if self
                .host
                .post(generation, move || handler.deliver(&event))
            {
                posted += 1;
            }
        }
        trace!(connection = %entry.name(), posted, "hook events flushed");
        posted
    }

    fn materialize(&self, connection: &str, conn: &Connection, record: JournalRecord) -> HookEvent {
        match record {
            JournalRecord::Update {
                database,
                table,
                operation,
                row_id,
            } => {
                let row = match operation {
                    UpdateOperation::Delete => None,
                    _ => read_back(conn, &database, &table, row_id),
                };
                HookEvent::Update(UpdateEvent {
                    connection: connection.to_string(),
                    database,
                    table,
                    operation,
                    row_id,
                    row,
                })
            }
            JournalRecord::Commit => HookEvent::Commit(CommitEvent {
                connection: connection.to_string(),
            }),
            JournalRecord::Rollback => HookEvent::Rollback(RollbackEvent {
                connection: connection.to_string(),
            }),
        }
    }
}

/// Per-statement capture point handed to engine work by `HookDispatcher::run`.
pub struct StatementTap<'a> {
    dispatcher: &'a HookDispatcher,
    entry: &'a ConnectionEntry,
}

impl StatementTap<'_> {
    /// Call after each statement completes, before the next one starts.
    pub fn after_statement(&self, conn: &Connection) {
        self.dispatcher.capture(self.entry, conn);
    }
}

/// Current image of `database.table` at `row_id`, if it still exists.
fn read_back(conn: &Connection, database: &str, table: &str, row_id: i64) -> Option<RowSnapshot> {
    let sql = format!(
        "SELECT * FROM {}.{} WHERE rowid = ?1",
        quote_ident(database),
        quote_ident(table)
    );
    match query::execute_cached(conn, &sql, &[Value::Integer(row_id)]) {
        Ok(result) => result.first_snapshot(),
        Err(err) => {
            debug!(table, row_id, error = %err, "hook row read-back failed");
            None
        }
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
