//! Shell-token escaping for command-line values.
//!
//! Every parameter value rendered by the builder passes through
//! [`shell_escape`], which guarantees the value occupies exactly one token
//! when the assembled command line is re-split with shell tokenization
//! rules, regardless of its content.

/// Escape one scalar value so it is safe to place unquoted between spaces
/// on a command line.
///
/// Characters in `[A-Za-z0-9_./-]` pass through untouched; every other
/// character is preceded by a backslash. A newline is rendered as `'\n'`
/// instead, because a backslash-newline is a line continuation under
/// shell rules and would vanish on re-splitting. The empty string
/// renders as `''` so it still produces a token.
pub fn shell_escape(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }

    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '_' | '.' | '/' | '-' => escaped.push(ch),
            '\n' => escaped.push_str("'\n'"),
            _ => {
                escaped.push('\\');
                escaped.push(ch);
            }
        }
    }
    escaped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
