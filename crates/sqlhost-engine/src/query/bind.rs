//! Positional parameter binding and column introspection.

use rusqlite::Statement;
use sqlhost_core::errors::EngineError;
use sqlhost_core::types::{ColumnMeta, Value};

/// Bind `params` positionally (`?1..?n`). The count must match exactly.
pub fn bind_params(stmt: &mut Statement<'_>, params: &[Value]) -> Result<(), EngineError> {
    let expected = stmt.parameter_count();
    if expected != params.len() {
        return Err(EngineError::ParameterCount {
            expected,
            actual: params.len(),
        });
    }
    for (idx, value) in params.iter().enumerate() {
        stmt.raw_bind_parameter(idx + 1, value)?;
    }
    Ok(())
}

/// Column names and declared types, available before the first step.
pub fn column_meta(stmt: &Statement<'_>) -> Vec<ColumnMeta> {
    stmt.columns()
        .iter()
        .map(|col| ColumnMeta::new(col.name(), col.decl_type().map(str::to_string)))
        .collect()
}
