//! Batch/transaction runner and SQL script loading.

pub mod runner;
pub mod script;

pub use runner::{execute_batch, execute_batch_with};
pub use script::{load_script, load_script_with, split_statements};
