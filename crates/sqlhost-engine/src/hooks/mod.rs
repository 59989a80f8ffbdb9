//! Hook dispatch: engine callbacks journal events synchronously; after each
//! statement the dispatcher reads back post-images, and after each engine
//! call it posts one host message per event, in engine order.

pub mod dispatcher;
pub mod journal;
pub mod slots;
pub mod trampoline;

pub use dispatcher::{HookDispatcher, StatementTap};
pub use journal::{HookJournal, JournalRecord};
pub use slots::HookSlots;
