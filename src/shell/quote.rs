//! Quoting for values interpolated into `sh -c` scripts.

use std::path::Path;

/// Quote a word for a POSIX shell.
///
/// Plain words pass through unchanged. Anything else is wrapped in single
/// quotes, with embedded single quotes closed, escaped and reopened.
///
/// ```
/// use dockstrap::shell::shell_quote;
///
/// assert_eq!(shell_quote("/home/alice/bin"), "/home/alice/bin");
/// assert_eq!(shell_quote("/home/John Doe/bin"), "'/home/John Doe/bin'");
/// ```
pub fn shell_quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    if word
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.' | ':' | ',' | '+'))
    {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Quote a path for a POSIX shell.
pub fn quote_path(path: &Path) -> String {
    shell_quote(&path.to_string_lossy())
}
