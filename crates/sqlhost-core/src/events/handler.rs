//! HookHandler trait with no-op defaults, plus closure adapters.

use std::sync::Arc;

use super::types::*;

/// Trait for receiving hook notifications on the host thread.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about. A handler is registered per
/// connection and per kind; the dispatcher only calls the method matching
/// the slot it was registered in.
pub trait HookHandler: Send + Sync {
    fn on_update(&self, _event: &UpdateEvent) {}
    fn on_commit(&self, _event: &CommitEvent) {}
    fn on_rollback(&self, _event: &RollbackEvent) {}

    /// Route a journaled event to the matching method.
    fn deliver(&self, event: &HookEvent) {
        match event {
            HookEvent::Update(e) => self.on_update(e),
            HookEvent::Commit(e) => self.on_commit(e),
            HookEvent::Rollback(e) => self.on_rollback(e),
        }
    }
}

struct UpdateFn<F>(F);
struct CommitFn<F>(F);
struct RollbackFn<F>(F);

impl<F: Fn(&UpdateEvent) + Send + Sync> HookHandler for UpdateFn<F> {
    fn on_update(&self, event: &UpdateEvent) {
        (self.0)(event)
    }
}

impl<F: Fn(&CommitEvent) + Send + Sync> HookHandler for CommitFn<F> {
    fn on_commit(&self, event: &CommitEvent) {
        (self.0)(event)
    }
}

impl<F: Fn(&RollbackEvent) + Send + Sync> HookHandler for RollbackFn<F> {
    fn on_rollback(&self, event: &RollbackEvent) {
        (self.0)(event)
    }
}

/// Wrap a closure as an update handler.
pub fn on_update<F>(f: F) -> Arc<dyn HookHandler>
where
    F: Fn(&UpdateEvent) + Send + Sync + 'static,
{
    Arc::new(UpdateFn(f))
}

/// Wrap a closure as a commit handler.
pub fn on_commit<F>(f: F) -> Arc<dyn HookHandler>
where
    F: Fn(&CommitEvent) + Send + Sync + 'static,
{
    Arc::new(CommitFn(f))
}

/// Wrap a closure as a rollback handler.
pub fn on_rollback<F>(f: F) -> Arc<dyn HookHandler>
where
    F: Fn(&RollbackEvent) + Send + Sync + 'static,
{
    Arc::new(RollbackFn(f))
}
