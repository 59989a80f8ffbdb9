//! Batch command descriptions and their results.

use serde::{Deserialize, Serialize};

use super::Value;

/// Parameters attached to one batch command.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum BatchParams {
    /// Run once with no bound parameters.
    #[default]
    None,
    /// Run once with one parameter set.
    Single(Vec<Value>),
    /// Run once per parameter set, reusing the compiled statement.
    Many(Vec<Vec<Value>>),
}

/// One `(sql, params)` entry of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCommand {
    pub sql: String,
    pub params: BatchParams,
}

impl BatchCommand {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: BatchParams::None,
        }
    }

    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params: BatchParams::Single(params),
        }
    }

    pub fn with_param_sets(sql: impl Into<String>, sets: Vec<Vec<Value>>) -> Self {
        Self {
            sql: sql.into(),
            params: BatchParams::Many(sets),
        }
    }

    /// Parameter sets in execution order. `None` yields a single empty set.
    pub fn param_sets(&self) -> Vec<&[Value]> {
        match &self.params {
            BatchParams::None => vec![<&[Value]>::default()],
            BatchParams::Single(set) => vec![set.as_slice()],
            BatchParams::Many(sets) => sets.iter().map(Vec::as_slice).collect(),
        }
    }
}

/// Outcome of a committed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub rows_affected: u64,
}

/// Outcome of a loaded SQL script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScriptResult {
    pub rows_affected: u64,
    /// Number of statements executed.
    pub commands: usize,
}
