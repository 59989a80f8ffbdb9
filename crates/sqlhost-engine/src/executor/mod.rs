//! Per-connection FIFO scheduling on top of the worker pool.

pub mod serial;

pub use serial::SerialExecutor;
