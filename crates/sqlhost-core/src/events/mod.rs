//! Hook event system for sqlhost.
//! Trait with no-op defaults, one handler slot per connection per kind.

pub mod handler;
pub mod types;

pub use handler::{on_commit, on_rollback, on_update, HookHandler};
pub use types::{CommitEvent, HookEvent, HookKind, RollbackEvent, UpdateEvent, UpdateOperation};
