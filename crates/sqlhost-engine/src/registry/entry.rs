//! One open connection and its hook state.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use sqlhost_core::errors::{EngineError, LifecycleError};
use sqlhost_core::events::{HookHandler, HookKind};
use sqlhost_core::SqlHostResult;
use tracing::debug;

use super::location::Location;
use crate::hooks::{trampoline, HookJournal, HookSlots};
use crate::pool::lock;

/// A live connection. Closing takes the handle out, so holders of an
/// `Arc<ConnectionEntry>` observe the close instead of a dangling handle.
pub struct ConnectionEntry {
    name: String,
    location: Location,
    conn: Mutex<Option<Connection>>,
    slots: Mutex<HookSlots>,
    journal: HookJournal,
}

impl ConnectionEntry {
    pub(crate) fn new(name: &str, location: Location, conn: Connection) -> Self {
        Self {
            name: name.to_string(),
            location,
            conn: Mutex::new(Some(conn)),
            slots: Mutex::new(HookSlots::default()),
            journal: HookJournal::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn is_open(&self) -> bool {
        lock(&self.conn).is_some()
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<T, F>(&self, f: F) -> SqlHostResult<T>
    where
        F: FnOnce(&Connection) -> SqlHostResult<T>,
    {
        let guard = lock(&self.conn);
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(LifecycleError::NotOpen {
                name: self.name.clone(),
            }
            .into()),
        }
    }

    pub(crate) fn handler(&self, kind: HookKind) -> Option<Arc<dyn HookHandler>> {
        lock(&self.slots).get(kind)
    }

    /// Replace the handler for `kind`, returning the previous one.
    pub(crate) fn set_handler(
        &self,
        kind: HookKind,
        handler: Option<Arc<dyn HookHandler>>,
    ) -> Option<Arc<dyn HookHandler>> {
        lock(&self.slots).set(kind, handler)
    }

    pub(crate) fn journal(&self) -> &HookJournal {
        &self.journal
    }

    /// Uninstall hooks and close the engine handle. Closing twice is a no-op.
    pub(crate) fn close(&self) -> Result<(), EngineError> {
        let taken = lock(&self.conn).take();
        lock(&self.slots).clear();
        self.journal.clear();
        if let Some(conn) = taken {
            trampoline::uninstall_all(&conn);
            conn.close().map_err(|(_, e)| EngineError::from(e))?;
            debug!(connection = %self.name, "connection closed");
        }
        Ok(())
    }
}
