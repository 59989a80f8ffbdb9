//! Data model shared by the engine and its hosts.
//! Typed SQL values, row snapshots, column metadata and operation results.

pub mod batch;
pub mod collections;
pub mod result;
pub mod value;

pub use batch::{BatchCommand, BatchParams, BatchResult, ScriptResult};
pub use collections::FxHashMap;
pub use result::{ColumnMeta, QueryResult, Row, RowSnapshot};
pub use value::Value;
