//! Parameter store and `${KEY}` substitution.
//!
//! One store instance is constructed per run and threaded by reference
//! through the whole traversal; every included file reads and writes the
//! same map; there is no file-local shadowing. Each entry remembers which
//! source wrote it, and the write rules below are what give the caller's
//! `--param` flags, the `set` directive, the `param` directive, and the
//! caller's parameter files their precedence order.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Which source produced a parameter's current value, lowest precedence
/// first. A write only lands when the rules in the methods below allow
/// its source to displace the entry's current origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Caller-supplied parameter-file default.
    Default,
    /// `param` directive.
    Defined,
    /// `set` directive.
    Assigned,
    /// Caller-supplied `--param` flag; never overwritten.
    Locked,
}

/// Key/value parameter store with precedence tiers.
#[derive(Debug, Default)]
pub struct ParamStore {
    vars: HashMap<String, (String, Origin)>,
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]*)\}").unwrap())
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a parameter, from any source.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|(v, _)| v.as_str())
    }

    /// Returns `true` if the parameter has a value.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Install a caller-supplied file default (lowest precedence). A
    /// later default for the same key replaces an earlier one; anything
    /// already written by a stronger source is left alone.
    pub fn preset(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if matches!(self.vars.get(&name), None | Some((_, Origin::Default))) {
            self.vars.insert(name, (value.into(), Origin::Default));
        }
    }

    /// Install a caller-locked value (highest precedence). No in-DSL
    /// directive can touch it afterwards.
    pub fn lock(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), (value.into(), Origin::Locked));
    }

    /// `param` directive: substitutes the value eagerly against current
    /// store contents, then writes only when the name is absent or still
    /// holds a file default. The first `param` for a key wins over later
    /// ones, and any `set` wins over `param` regardless of order.
    pub fn define(&mut self, name: &str, value: &str) {
        let value = self.substitute(value);
        if matches!(self.vars.get(name), None | Some((_, Origin::Default))) {
            self.vars.insert(name.to_owned(), (value, Origin::Defined));
        }
    }

    /// `set` directive: substitutes the value eagerly against current
    /// store contents, then writes unless the name is locked.
    pub fn assign(&mut self, name: &str, value: &str) {
        let value = self.substitute(value);
        if !matches!(self.vars.get(name), Some((_, Origin::Locked))) {
            self.vars.insert(name.to_owned(), (value, Origin::Assigned));
        }
    }

    /// Replace every `${KEY}` occurrence whose key is present in the
    /// store, in a single left-to-right scan. Unknown keys pass through
    /// as literal `${KEY}` text (not an error), and replacement values
    /// are not rescanned.
    pub fn substitute(&self, text: &str) -> String {
        placeholder()
            .replace_all(text, |caps: &Captures| match self.get(&caps[1]) {
                Some(value) => value.to_owned(),
                None => caps[0].to_owned(),
            })
            .into_owned()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let mut params = ParamStore::new();
        params.define("schema", "public");
        assert_eq!(params.get("schema"), Some("public"));
    }

    #[test]
    fn first_define_wins() {
        let mut params = ParamStore::new();
        params.define("v", "first");
        params.define("v", "second");
        assert_eq!(params.get("v"), Some("first"));
    }

    #[test]
    fn assign_overrides_define_in_either_order() {
        let mut params = ParamStore::new();
        params.define("a", "1");
        params.assign("a", "2");
        assert_eq!(params.get("a"), Some("2"));

        params.assign("b", "2");
        params.define("b", "1");
        assert_eq!(params.get("b"), Some("2"));
    }

    #[test]
    fn reassign_overwrites() {
        let mut params = ParamStore::new();
        params.assign("x", "old");
        params.assign("x", "new");
        assert_eq!(params.get("x"), Some("new"));
    }

    #[test]
    fn locked_beats_everything() {
        let mut params = ParamStore::new();
        params.lock("v", "9");
        params.assign("v", "5");
        params.define("v", "1");
        assert_eq!(params.get("v"), Some("9"));
    }

    #[test]
    fn define_overrides_file_default() {
        let mut params = ParamStore::new();
        params.preset("v", "from_file");
        params.define("v", "from_param");
        assert_eq!(params.get("v"), Some("from_param"));
    }

    #[test]
    fn later_preset_replaces_earlier() {
        let mut params = ParamStore::new();
        params.preset("v", "file1");
        params.preset("v", "file2");
        assert_eq!(params.get("v"), Some("file2"));
    }

    #[test]
    fn preset_never_downgrades() {
        let mut params = ParamStore::new();
        params.assign("v", "set");
        params.preset("v", "default");
        assert_eq!(params.get("v"), Some("set"));
    }

    #[test]
    fn substitute_known_and_unknown() {
        let mut params = ParamStore::new();
        params.assign("env", "prod");
        assert_eq!(
            params.substitute("deploy-${env}-${region}.sql"),
            "deploy-prod-${region}.sql"
        );
    }

    #[test]
    fn substitute_without_placeholders_is_identity() {
        let params = ParamStore::new();
        assert_eq!(params.substitute("plain text $100 {braces}"), "plain text $100 {braces}");
    }

    #[test]
    fn substitute_does_not_rescan_replacements() {
        let mut params = ParamStore::new();
        params.assign("a", "${b}");
        params.assign("b", "deep");
        assert_eq!(params.substitute("${a}"), "${b}");
    }

    #[test]
    fn values_substitute_eagerly_on_write() {
        let mut params = ParamStore::new();
        params.assign("host", "db1");
        params.assign("url", "pg://${host}/app");
        // A later change to `host` must not retroactively edit `url`.
        params.assign("host", "db2");
        assert_eq!(params.get("url"), Some("pg://db1/app"));
    }

    #[test]
    fn missing_returns_none() {
        let params = ParamStore::new();
        assert_eq!(params.get("nope"), None);
        assert!(!params.contains("nope"));
    }
}
