//! Engine-side hook callbacks. They only append to the journal: no engine
//! calls, no host calls, no blocking.

use rusqlite::hooks::Action;
use rusqlite::Connection;
use sqlhost_core::events::{HookKind, UpdateOperation};

use super::journal::{HookJournal, JournalRecord};

/// Install the trampoline for `kind`, replacing any previous one.
pub fn install(conn: &Connection, kind: HookKind, journal: &HookJournal) {
    let journal = journal.clone();
    match kind {
        HookKind::Update => conn.update_hook(Some(
            move |action: Action, database: &str, table: &str, row_id: i64| {
                let operation = match action {
                    Action::SQLITE_INSERT => UpdateOperation::Insert,
                    Action::SQLITE_UPDATE => UpdateOperation::Update,
                    Action::SQLITE_DELETE => UpdateOperation::Delete,
                    _ => return,
                };
                journal.push(JournalRecord::Update {
                    database: database.to_string(),
                    table: table.to_string(),
                    operation,
                    row_id,
                });
            },
        )),
        HookKind::Commit => conn.commit_hook(Some(move || {
            journal.push(JournalRecord::Commit);
            // Never veto: the host answers asynchronously.
            false
        })),
        HookKind::Rollback => conn.rollback_hook(Some(move || {
            journal.push(JournalRecord::Rollback);
        })),
    }
}

pub fn uninstall(conn: &Connection, kind: HookKind) {
    match kind {
        HookKind::Update => conn.update_hook(None::<fn(Action, &str, &str, i64)>),
        HookKind::Commit => conn.commit_hook(None::<fn() -> bool>),
        HookKind::Rollback => conn.rollback_hook(None::<fn()>),
    }
}

pub fn uninstall_all(conn: &Connection) {
    for kind in [HookKind::Update, HookKind::Commit, HookKind::Rollback] {
        uninstall(conn, kind);
    }
}
