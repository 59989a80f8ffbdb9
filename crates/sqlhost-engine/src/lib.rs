//! sqlhost-engine: the asynchronous execution engine.
//!
//! A fixed worker pool runs blocking SQLite work off the host thread. Work
//! for one connection name is serialized FIFO with no overlap, while
//! different connections proceed in parallel. Completions and hook
//! notifications come back through a single-consumer host channel that
//! the host thread drains.

pub mod batch;
pub mod executor;
pub mod hooks;
pub mod host;
pub mod pool;
pub mod query;
pub mod registry;
pub mod runtime;
pub mod statement;

pub use host::{HostLoop, Pending, WaitError};
pub use pool::{PoolState, WorkerPool};
pub use runtime::Runtime;
pub use statement::PreparedStatement;
