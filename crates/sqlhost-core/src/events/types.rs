//! Event payload types for the update, commit and rollback hooks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::RowSnapshot;

/// The three hook channels a connection exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookKind {
    Update,
    Commit,
    Rollback,
}

impl HookKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Commit => "commit",
            Self::Rollback => "rollback",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of row change reported by the update hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateOperation {
    Insert,
    Update,
    Delete,
}

impl UpdateOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// Payload for `on_update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEvent {
    /// Logical connection name the change happened on.
    pub connection: String,
    /// Schema name reported by the engine (`main`, `temp` or an attach alias).
    pub database: String,
    pub table: String,
    pub operation: UpdateOperation,
    pub row_id: i64,
    /// Post-image of the row; always `None` for deletes, and `None` when the
    /// row could not be read back.
    pub row: Option<RowSnapshot>,
}

/// Payload for `on_commit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEvent {
    pub connection: String,
}

/// Payload for `on_rollback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackEvent {
    pub connection: String,
}

/// Any hook notification, in the order the engine produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HookEvent {
    Update(UpdateEvent),
    Commit(CommitEvent),
    Rollback(RollbackEvent),
}

impl HookEvent {
    pub fn kind(&self) -> HookKind {
        match self {
            Self::Update(_) => HookKind::Update,
            Self::Commit(_) => HookKind::Commit,
            Self::Rollback(_) => HookKind::Rollback,
        }
    }

    pub fn connection(&self) -> &str {
        match self {
            Self::Update(e) => &e.connection,
            Self::Commit(e) => &e.connection,
            Self::Rollback(e) => &e.connection,
        }
    }
}
