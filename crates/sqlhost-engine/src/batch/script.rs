//! SQL script loading: split a file into statements and run them as a batch.

use std::path::Path;

use rusqlite::Connection;
use sqlhost_core::errors::EngineError;
use sqlhost_core::types::{BatchCommand, ScriptResult};

use super::runner::execute_batch_with;
use crate::query::top_level_words;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    /// Inside a quoted literal or identifier closed by this char.
    Quoted(char),
    LineComment,
    BlockComment,
}

/// Split `sql` on `;` outside string literals, quoted identifiers and
/// comments. Comments are dropped and blank statements skipped. The
/// `BEGIN ... END` body of `CREATE TRIGGER` stays in one statement.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut state = Scan::Code;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            Scan::Code => match c {
                ';' if inside_trigger_body(&current) => current.push(c),
                ';' => push_statement(&mut statements, &mut current),
                '\'' | '"' | '`' => {
                    state = Scan::Quoted(c);
                    current.push(c);
                }
                '[' => {
                    state = Scan::Quoted(']');
                    current.push(c);
                }
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    state = Scan::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = Scan::BlockComment;
                }
                _ => current.push(c),
            },
            Scan::Quoted(close) => {
                current.push(c);
                if c == close {
                    // A doubled quote is an escaped quote, not the end.
                    if close != ']' && chars.peek() == Some(&close) {
                        if let Some(escaped) = chars.next() {
                            current.push(escaped);
                        }
                    } else {
                        state = Scan::Code;
                    }
                }
            }
            Scan::LineComment => {
                if c == '\n' {
                    current.push('\n');
                    state = Scan::Code;
                }
            }
            Scan::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    current.push(' ');
                    state = Scan::Code;
                }
            }
        }
    }
    push_statement(&mut statements, &mut current);
    statements
}

/// True while `current` is a `CREATE [TEMP] TRIGGER` whose `BEGIN` has not
/// met its matching `END`. Each `CASE` in the body opens one more `END`.
fn inside_trigger_body(current: &str) -> bool {
    let words = top_level_words(current);
    let is_trigger = words.first().is_some_and(|w| w == "CREATE")
        && words.iter().take(4).any(|w| w == "TRIGGER");
    if !is_trigger {
        return false;
    }
    let mut depth: Option<usize> = None;
    for word in &words {
        match (word.as_str(), depth) {
            ("BEGIN", None) => depth = Some(1),
            ("CASE", Some(open)) => depth = Some(open + 1),
            ("END", Some(open)) => depth = Some(open.saturating_sub(1)),
            _ => {}
        }
    }
    depth.is_some_and(|open| open > 0)
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
    current.clear();
}

/// Read `path`, split it and run every statement in one transaction.
pub fn load_script(conn: &Connection, path: &Path) -> Result<ScriptResult, EngineError> {
    load_script_with(conn, path, |_| {})
}

/// `load_script` calling `after_statement` as each statement completes.
pub fn load_script_with<F>(
    conn: &Connection,
    path: &Path,
    after_statement: F,
) -> Result<ScriptResult, EngineError>
where
    F: FnMut(&Connection),
{
    let sql = std::fs::read_to_string(path)
        .map_err(|e| EngineError::io(path.display().to_string(), &e))?;
    let commands: Vec<BatchCommand> = split_statements(&sql)
        .into_iter()
        .map(BatchCommand::new)
        .collect();
    let batch = execute_batch_with(conn, &commands, after_statement)?;
    Ok(ScriptResult {
        rows_affected: batch.rows_affected,
        commands: commands.len(),
    })
}
