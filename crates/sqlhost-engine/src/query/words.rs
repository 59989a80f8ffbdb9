//! Keyword-level view of SQL text.

/// Upper-cased bare words of `sql` at parenthesis depth zero. Quoted
/// literals and identifiers, comments and anything inside parentheses are
/// skipped.
pub fn top_level_words(sql: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut depth = 0_usize;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            if depth == 0 {
                word.push(c.to_ascii_uppercase());
            }
            continue;
        }
        if !word.is_empty() {
            words.push(std::mem::take(&mut word));
        }
        match c {
            '\'' | '"' | '`' | '[' => {
                let close = if c == '[' { ']' } else { c };
                // A doubled quote reopens immediately, which skips it too.
                for q in chars.by_ref() {
                    if q == close {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for q in chars.by_ref() {
                    if q == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for q in chars.by_ref() {
                    if prev == '*' && q == '/' {
                        break;
                    }
                    prev = q;
                }
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    if !word.is_empty() {
        words.push(word);
    }
    words
}

/// True for `INSERT` and `REPLACE`, including behind a `WITH` clause.
pub fn is_insert(sql: &str) -> bool {
    let words = top_level_words(sql);
    let mut words = words.iter().map(String::as_str);
    match words.next() {
        Some("INSERT" | "REPLACE") => true,
        Some("WITH") => words
            .find(|w| matches!(*w, "INSERT" | "REPLACE" | "UPDATE" | "DELETE" | "SELECT" | "VALUES"))
            .is_some_and(|w| matches!(w, "INSERT" | "REPLACE")),
        _ => false,
    }
}
