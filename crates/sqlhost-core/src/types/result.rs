//! Connection-agnostic query results.

use serde::{Deserialize, Serialize};

/// Name and declared type of one result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    /// Declared type from the table schema; `None` for expressions.
    pub decl_type: Option<String>,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, decl_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            decl_type,
        }
    }
}

/// One result row. Cell order matches the owning result's column order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<super::Value>,
}

impl Row {
    pub fn new(cells: Vec<super::Value>) -> Self {
        Self { cells }
    }

    pub fn get(&self, index: usize) -> Option<&super::Value> {
        self.cells.get(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn values(&self) -> &[super::Value] {
        &self.cells
    }

    pub fn into_values(self) -> Vec<super::Value> {
        self.cells
    }
}

/// Outcome of a single successful statement execution.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Rows changed by the statement; always 0 for read-only statements.
    pub rows_affected: u64,
    /// Last inserted rowid, present only when the statement changed rows.
    pub insert_id: Option<i64>,
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Look up a cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&super::Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Snapshot of the first row together with the column metadata.
    pub fn first_snapshot(&self) -> Option<RowSnapshot> {
        self.rows.first().map(|row| RowSnapshot {
            columns: self.columns.clone(),
            row: row.clone(),
        })
    }

    /// Rows as JSON objects keyed by column name, in row order.
    pub fn rows_as_json(&self) -> serde_json::Value {
        let rows = self
            .rows
            .iter()
            .map(|row| row_object(&self.columns, row))
            .collect();
        serde_json::Value::Array(rows)
    }
}

/// A single row detached from its result, carrying its own column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSnapshot {
    pub columns: Vec<ColumnMeta>,
    pub row: Row,
}

impl RowSnapshot {
    pub fn get(&self, column: &str) -> Option<&super::Value> {
        let idx = self.columns.iter().position(|c| c.name == column)?;
        self.row.get(idx)
    }

    pub fn to_json(&self) -> serde_json::Value {
        row_object(&self.columns, &self.row)
    }
}

fn row_object(columns: &[ColumnMeta], row: &Row) -> serde_json::Value {
    let map = columns
        .iter()
        .zip(row.values())
        .map(|(col, value)| (col.name.clone(), value.to_json()))
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(map)
}
