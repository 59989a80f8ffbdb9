//! sqlhost-core: shared vocabulary for the sqlhost execution engine.
//!
//! - Types: SQL values, rows, column metadata, query and batch results
//! - Errors: one `thiserror` enum per concern plus the `SqlHostError` aggregate
//! - Config: TOML-based, layered resolution (overrides > env > project > defaults)
//! - Events: hook notification payloads and the `HookHandler` capability trait
//! - Traits: cooperative cancellation used as the teardown generation flag
//! - Tracing: `SQLHOST_LOG` driven subscriber setup

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod traits;
pub mod tracing;
pub mod types;

pub use config::SqlHostConfig;
pub use errors::{SqlHostError, SqlHostResult};
pub use events::{HookEvent, HookHandler, HookKind};
pub use traits::{Cancellable, CancellationToken};
pub use types::{BatchCommand, BatchParams, BatchResult, ColumnMeta, QueryResult, Row, ScriptResult, Value};
