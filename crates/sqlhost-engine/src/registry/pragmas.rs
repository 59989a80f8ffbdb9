//! PRAGMA configuration applied to every opened connection.

use rusqlite::Connection;
use sqlhost_core::config::StorageConfig;
use sqlhost_core::errors::EngineError;

/// Apply `busy_timeout` always, `journal_mode` and `foreign_keys` when configured.
pub fn apply_pragmas(conn: &Connection, storage: &StorageConfig) -> Result<(), EngineError> {
    conn.busy_timeout(storage.effective_busy_timeout())?;
    if let Some(mode) = storage.journal_mode.as_deref() {
        // In-memory databases answer "memory" regardless of the requested mode.
        conn.pragma_update_and_check(None, "journal_mode", mode, |row| row.get::<_, String>(0))?;
    }
    if let Some(enabled) = storage.foreign_keys {
        conn.pragma_update(None, "foreign_keys", enabled)?;
    }
    Ok(())
}

/// Current journal mode, lowercase as SQLite reports it.
pub fn journal_mode(conn: &Connection) -> Result<String, EngineError> {
    Ok(conn.pragma_query_value(None, "journal_mode", |row| row.get(0))?)
}
