//! Observability for sqlhost.
//! `tracing` crate with `EnvFilter`, driven by `SQLHOST_LOG`.

pub mod setup;

pub use setup::init_tracing;
