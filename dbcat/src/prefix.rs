//! Per-file command-prefix filtering.
//!
//! `set-prefix ns` puts the file into a namespace: from then on only
//! lines carrying a literal `ns:` are dispatched (stripped of the tag),
//! and everything else is silently dropped until `ns:clear-prefix`. The
//! scope is strictly file-local: an `include` starts unfiltered and the
//! caller's prefix is untouched when it resumes.

use crate::directive;

/// Outcome of running one trimmed line through the guard.
#[derive(Debug, PartialEq, Eq)]
pub enum Gate<'a> {
    /// Dispatch this (possibly prefix-stripped) line.
    Run(&'a str),
    /// The line deactivated the prefix; nothing further to dispatch.
    Cleared,
    /// Unprefixed line while a prefix is active: silently dropped, not
    /// an error.
    Dropped,
}

/// File-local namespace requirement.
#[derive(Debug, Default)]
pub struct PrefixScope {
    /// Active prefix stored with its trailing colon.
    tag: Option<String>,
}

impl PrefixScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// `set-prefix` handler. An empty token deactivates filtering.
    pub fn set(&mut self, token: &str) {
        self.tag = if token.is_empty() {
            None
        } else {
            Some(format!("{token}:"))
        };
    }

    /// Gate a directive line. `set-prefix` itself is never filtered, so
    /// the guard can always be retargeted even while a prefix is active.
    pub fn gate<'a>(&mut self, line: &'a str) -> Gate<'a> {
        match self.tag.as_deref() {
            None => return Gate::Run(line),
            Some(tag) => match line.strip_prefix(tag) {
                Some("clear-prefix") => {}
                Some(rest) => return Gate::Run(rest),
                None if directive::split_command(line).0 == "set-prefix" => {
                    return Gate::Run(line)
                }
                None => return Gate::Dropped,
            },
        }
        self.tag = None;
        Gate::Cleared
    }

    /// Strip the active prefix from a trimmed candidate line when
    /// matching the `text-end` marker inside a text block.
    pub fn strip_marker<'a>(&self, trimmed: &'a str) -> &'a str {
        match self.tag.as_deref() {
            Some(tag) => trimmed.strip_prefix(tag).unwrap_or(trimmed),
            None => trimmed,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
