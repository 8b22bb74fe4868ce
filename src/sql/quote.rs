//! Identifier and literal quoting for the warehouse dialect.
//!
//! Every identifier the crate emits passes through [`quote_ident`] exactly
//! once, at token serialization time. The function is idempotent, so a
//! name that arrives already wrapped is never double-quoted.

/// Quote an identifier with double quotes.
///
/// Surrounding whitespace is trimmed first. Empty input is returned
/// unchanged, and input that is already wrapped in double quotes is
/// returned as-is. Embedded `"` characters are doubled.
pub fn quote_ident(raw: &str) -> String {
    let name = raw.trim();
    if name.is_empty() {
        return name.to_string();
    }
    // Already wrapped: a bare `"` must not count as wrapped.
    if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
        return name.to_string();
    }
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal with single quotes, doubling embedded `'`.
pub fn quote_literal(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}
