//! Pending-output fragments and the final rendering pass.
//!
//! Traversal never writes output directly; it queues [`Fragment`]s in
//! execution order. Once the whole instruction tree has been walked and
//! every parameter is final, [`resolve`] performs the one deferred
//! substitution rewrite, and [`write_all`] streams bytes to the sink in
//! fragment order: file bytes copied verbatim, literal text escape-decoded
//! just before writing. Nothing is reordered, merged, or truncated.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::params::ParamStore;

/// One queued unit of eventual output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Bytes of a referenced file. The stored path may still contain
    /// placeholders; it resolves against `base_dir` when relative.
    File { path: String, base_dir: PathBuf },
    /// Literal text from `emit` or a `text-begin` block; placeholders
    /// and escape tokens stay unresolved until the final pass.
    Text(String),
    /// A parameter reference from `print`. Unlike `Text`, failing to
    /// resolve one of these is a hard error.
    Print(String),
}

/// Decode the `@@n` / `@@r` / `@@t` / `@@s` escape tokens.
pub fn decode_escapes(s: &str) -> String {
    s.replace("@@n", "\n")
        .replace("@@r", "\r")
        .replace("@@t", "\t")
        .replace("@@s", " ")
}

/// The single deferred-substitution rewrite, run once after traversal
/// completes. Lets a `set` late in the tree retroactively resolve a
/// placeholder emitted earlier, or in a sibling included file.
///
/// `print` references collapse to their value here; a name with no value
/// is the only substitution failure; unresolved `${KEY}` placeholders
/// in text and paths pass through literally.
pub fn resolve(fragments: &mut [Fragment], params: &ParamStore) -> Result<()> {
    for fragment in fragments.iter_mut() {
        match fragment {
            Fragment::File { path, .. } => *path = params.substitute(path),
            Fragment::Text(text) => *text = params.substitute(text),
            Fragment::Print(name) => {
                let value = params
                    .get(name)
                    .ok_or_else(|| Error::UndefinedPrint(name.clone()))?
                    .to_owned();
                *fragment = Fragment::Text(value);
            }
        }
    }
    Ok(())
}

/// Stream fragments to the sink in order.
pub fn write_all(fragments: &[Fragment], out: &mut dyn Write) -> Result<()> {
    for fragment in fragments {
        match fragment {
            Fragment::File { path, base_dir } => {
                let resolved = resolve_path(&decode_escapes(path), base_dir);
                let mut source = File::open(&resolved).map_err(|e| Error::ReadSource {
                    path: resolved.clone(),
                    source: e,
                })?;
                io::copy(&mut source, out).map_err(|e| Error::CopySource {
                    path: resolved,
                    source: e,
                })?;
            }
            Fragment::Text(text) => {
                out.write_all(decode_escapes(text).as_bytes())
                    .map_err(Error::WriteOutput)?;
            }
            Fragment::Print(name) => {
                // resolve() rewrites these; one that slipped through
                // renders in its placeholder form.
                out.write_all(decode_escapes(&format!("${{{name}}}")).as_bytes())
                    .map_err(Error::WriteOutput)?;
            }
        }
    }
    Ok(())
}

fn resolve_path(path: &str, base_dir: &Path) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_tokens() {
        assert_eq!(decode_escapes("A@@nB"), "A\nB");
        assert_eq!(decode_escapes("@@t@@r@@s"), "\t\r ");
        assert_eq!(decode_escapes("no escapes"), "no escapes");
        assert_eq!(decode_escapes("@@x"), "@@x");
    }

    #[test]
    fn resolve_substitutes_text_and_paths() {
        let mut params = ParamStore::new();
        params.assign("V", "1");
        let mut fragments = vec![
            Fragment::Text("value=${V};".into()),
            Fragment::File {
                path: "${V}.sql".into(),
                base_dir: PathBuf::from("."),
            },
        ];
        resolve(&mut fragments, &params).unwrap();
        assert_eq!(fragments[0], Fragment::Text("value=1;".into()));
        assert_eq!(
            fragments[1],
            Fragment::File {
                path: "1.sql".into(),
                base_dir: PathBuf::from("."),
            }
        );
    }

    #[test]
    fn resolve_collapses_print() {
        let mut params = ParamStore::new();
        params.assign("V", "9");
        let mut fragments = vec![Fragment::Print("V".into())];
        resolve(&mut fragments, &params).unwrap();
        assert_eq!(fragments[0], Fragment::Text("9".into()));
    }

    #[test]
    fn resolve_fails_on_undefined_print() {
        let params = ParamStore::new();
        let mut fragments = vec![Fragment::Print("MISSING".into())];
        assert!(matches!(
            resolve(&mut fragments, &params),
            Err(Error::UndefinedPrint(name)) if name == "MISSING"
        ));
    }

    #[test]
    fn unresolved_placeholder_passes_through() {
        let params = ParamStore::new();
        let mut fragments = vec![Fragment::Text("${GHOST}".into())];
        resolve(&mut fragments, &params).unwrap();
        let mut out = Vec::new();
        write_all(&fragments, &mut out).unwrap();
        assert_eq!(out, b"${GHOST}");
    }

    #[test]
    fn literal_bytes_in_order() {
        let fragments = vec![
            Fragment::Text("one@@n".into()),
            Fragment::Text("two".into()),
        ];
        let mut out = Vec::new();
        write_all(&fragments, &mut out).unwrap();
        assert_eq!(out, b"one\ntwo");
    }

    #[test]
    fn missing_source_file_is_an_error() {
        let fragments = vec![Fragment::File {
            path: "does-not-exist.sql".into(),
            base_dir: PathBuf::from("/nonexistent-base"),
        }];
        let mut out = Vec::new();
        assert!(matches!(
            write_all(&fragments, &mut out),
            Err(Error::ReadSource { .. })
        ));
    }
}
