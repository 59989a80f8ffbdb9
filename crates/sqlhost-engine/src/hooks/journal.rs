//! Per-connection ordered record of engine hook callbacks.

use std::sync::{Arc, Mutex};

use sqlhost_core::events::{HookEvent, HookKind, UpdateOperation};

use crate::pool::lock;

/// What a trampoline captured inside the engine callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalRecord {
    Update {
        database: String,
        table: String,
        operation: UpdateOperation,
        row_id: i64,
    },
    Commit,
    Rollback,
}

impl JournalRecord {
    pub fn kind(&self) -> HookKind {
        match self {
            Self::Update { .. } => HookKind::Update,
            Self::Commit => HookKind::Commit,
            Self::Rollback => HookKind::Rollback,
        }
    }
}

/// Shared between a connection's trampolines and its dispatcher. Update,
/// commit and rollback records share one queue so their order survives.
/// Records become staged events once their row images have been read back.
#[derive(Debug, Clone, Default)]
pub struct HookJournal {
    records: Arc<Mutex<Vec<JournalRecord>>>,
    staged: Arc<Mutex<Vec<HookEvent>>>,
}

impl HookJournal {
    pub fn push(&self, record: JournalRecord) {
        lock(&self.records).push(record);
    }

    pub fn drain(&self) -> Vec<JournalRecord> {
        std::mem::take(&mut *lock(&self.records))
    }

    pub fn stage(&self, events: impl IntoIterator<Item = HookEvent>) {
        lock(&self.staged).extend(events);
    }

    pub fn take_staged(&self) -> Vec<HookEvent> {
        std::mem::take(&mut *lock(&self.staged))
    }

    /// Forget pending records and staged events of one kind, e.g. after
    /// deregistering it.
    pub fn discard(&self, kind: HookKind) {
        lock(&self.records).retain(|record| record.kind() != kind);
        lock(&self.staged).retain(|event| event.kind() != kind);
    }

    pub fn clear(&self) {
        lock(&self.records).clear();
        lock(&self.staged).clear();
    }

    /// Records and staged events not yet handed to the host.
    pub fn len(&self) -> usize {
        lock(&self.records).len() + lock(&self.staged).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
