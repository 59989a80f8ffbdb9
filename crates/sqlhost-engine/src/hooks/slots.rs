//! At most one handler per hook kind.

use std::sync::Arc;

use sqlhost_core::events::{HookHandler, HookKind};

#[derive(Default)]
pub struct HookSlots {
    update: Option<Arc<dyn HookHandler>>,
    commit: Option<Arc<dyn HookHandler>>,
    rollback: Option<Arc<dyn HookHandler>>,
}

impl HookSlots {
    pub fn get(&self, kind: HookKind) -> Option<Arc<dyn HookHandler>> {
        self.slot(kind).clone()
    }

    /// Replace the slot for `kind`, returning what was there.
    pub fn set(
        &mut self,
        kind: HookKind,
        handler: Option<Arc<dyn HookHandler>>,
    ) -> Option<Arc<dyn HookHandler>> {
        std::mem::replace(self.slot_mut(kind), handler)
    }

    pub fn clear(&mut self) {
        self.update = None;
        self.commit = None;
        self.rollback = None;
    }

    fn slot(&self, kind: HookKind) -> &Option<Arc<dyn HookHandler>> {
        match kind {
            HookKind::Update => &self.update,
            HookKind::Commit => &self.commit,
            HookKind::Rollback => &self.rollback,
        }
    }

    fn slot_mut(&mut self, kind: HookKind) -> &mut Option<Arc<dyn HookHandler>> {
        match kind {
            HookKind::Update => &mut self.update,
            HookKind::Commit => &mut self.commit,
            HookKind::Rollback => &mut self.rollback,
        }
    }
}
