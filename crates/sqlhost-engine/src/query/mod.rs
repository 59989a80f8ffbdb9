//! Statement/result marshalling: bind, step, snapshot.

pub mod bind;
pub mod marshal;
pub mod words;

pub use bind::{bind_params, column_meta};
pub use marshal::{execute, execute_cached, run_statement};
pub use words::{is_insert, top_level_words};
