//! Shared helper functions for SQLite repositories.

/// Escape character used with `LIKE ... ESCAPE`.
pub const LIKE_ESCAPE: char = '\\';

/// Build a `LIKE` pattern matching `text` anywhere in a column.
///
/// `%`, `_` and the escape character itself are escaped so the search text
/// is matched literally. Use with `ESCAPE '\'`.
pub fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Whether a SQLx error is a UNIQUE constraint failure.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// Whether a SQLx error is a FOREIGN KEY constraint failure.
pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}
