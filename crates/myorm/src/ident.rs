//! Safe SQL identifier quoting.
//!
//! Every table and column name is wrapped in backticks exactly once when it
//! is rendered into SQL text; backticks inside a name are escaped by
//! doubling, per the MySQL quoting rule.

/// Append a backtick-quoted identifier to `out`.
pub(crate) fn write_quoted(out: &mut String, name: &str) {
    out.push('`');
    for ch in name.chars() {
        if ch == '`' {
            out.push('`');
            out.push('`');
        } else {
            out.push(ch);
        }
    }
    out.push('`');
}

/// Append a table-qualified, backtick-quoted column reference to `out`.
pub(crate) fn write_qualified(out: &mut String, table: &str, column: &str) {
    write_quoted(out, table);
    out.push('.');
    write_quoted(out, column);
}

/// Render a backtick-quoted identifier.
pub fn quoted(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    write_quoted(&mut out, name);
    out
}

/// Render a table-qualified column reference.
pub fn qualified(table: &str, column: &str) -> String {
    let mut out = String::with_capacity(table.len() + column.len() + 5);
    write_qualified(&mut out, table, column);
    out
}
