//! Raw instruction-line classification and splitting.
//!
//! Works on already-trimmed lines. Comment and blank lines never reach
//! the dispatcher; everything else splits into a command keyword and an
//! uninterpreted remainder.

/// `true` for a line the walker discards before dispatch: blank, or a
/// comment. A line is a comment only by its first non-whitespace
/// character being `#`; a mid-line `#` has no special meaning.
pub fn is_skippable(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Split a directive line on the first space into `(command, remainder)`.
/// The remainder is empty for a bare keyword.
pub fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(' ') {
        Some((command, rest)) => (command, rest),
        None => (line, ""),
    }
}

/// Split a `key=value` remainder at the first `=`. Also used for
/// parameter-file lines and `--param` flag values.
pub fn split_kv(args: &str) -> Option<(&str, &str)> {
    args.split_once('=')
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines() {
        assert!(is_skippable(""));
        assert!(is_skippable("# a comment"));
        assert!(is_skippable("#no space"));
        assert!(!is_skippable("emit # not a comment"));
    }

    #[test]
    fn command_with_remainder() {
        assert_eq!(split_command("concat a.sql"), ("concat", "a.sql"));
        assert_eq!(split_command("emit two  spaces"), ("emit", "two  spaces"));
    }

    #[test]
    fn bare_keyword() {
        assert_eq!(split_command("text-begin"), ("text-begin", ""));
    }

    #[test]
    fn key_value_splits_at_first_equals() {
        assert_eq!(split_kv("k=v"), Some(("k", "v")));
        assert_eq!(split_kv("k=a=b"), Some(("k", "a=b")));
        assert_eq!(split_kv("k="), Some(("k", "")));
        assert_eq!(split_kv("no-equals"), None);
    }
}
