//! Command-line argument parsing and parameter-file loading.
//!
//! Usage:
//!   dbcat [--param-file <files>] [--param <key=value>]... [--output <path>] <instructions_file>
//!
//! Flags accept `--flag value`, `--flag=value`, and single-dash forms.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::directive;
use crate::error::{Error, Result};
use crate::params::ParamStore;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Parameter files (`--param-file`, comma-separated), lowest
    /// precedence.
    pub param_files: Vec<PathBuf>,
    /// `--param key=value` pairs, locked at highest precedence. Later
    /// flags for the same key replace earlier ones.
    pub params: Vec<(String, String)>,
    /// Fallback output path (`--output`); any `output` directive in the
    /// instruction tree wins over it.
    pub output: Option<PathBuf>,
    /// The instructions file to walk.
    pub instructions: PathBuf,
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> std::result::Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(&raw[1..])
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> std::result::Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            i += 1;
            positional.extend(argv[i..].iter().cloned());
            break;
        }

        // Non-flag argument.
        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        let name = arg.trim_start_matches('-');
        let (name, inline) = match name.split_once('=') {
            Some((n, v)) => (n, Some(v.to_owned())),
            None => (name, None),
        };

        let take_value = |i: &mut usize| -> std::result::Result<String, String> {
            if let Some(v) = inline.clone() {
                return Ok(v);
            }
            *i += 1;
            argv.get(*i)
                .cloned()
                .ok_or_else(|| format!("--{name} requires an argument"))
        };

        match name {
            "param-file" => {
                let list = take_value(&mut i)?;
                args.param_files
                    .extend(list.split(',').map(PathBuf::from));
            }
            "param" => {
                let pair = take_value(&mut i)?;
                // A value with no `=` is ignored.
                if let Some((key, value)) = directive::split_kv(&pair) {
                    args.params.push((key.to_owned(), value.to_owned()));
                }
            }
            "output" => {
                args.output = Some(PathBuf::from(take_value(&mut i)?));
            }
            other => return Err(format!("unknown option: --{other}")),
        }
        i += 1;
    }

    match positional.len() {
        1 => args.instructions = PathBuf::from(positional.remove(0)),
        0 => return Err("missing instructions file".to_owned()),
        n => return Err(format!("too many arguments ({n})")),
    }

    Ok(args)
}

// ── Parameter files ───────────────────────────────────────────────────────────

/// Load one parameter file into the store at default precedence: one
/// `key=value` per line, `#` comments and blank lines skipped, hard
/// error on any other line.
pub fn load_param_file(path: &Path, params: &mut ParamStore) -> Result<()> {
    let file = File::open(path).map_err(|e| Error::ReadParamFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| Error::ReadParamFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let trimmed = line.trim();
        if directive::is_skippable(trimmed) {
            continue;
        }
        match directive::split_kv(trimmed) {
            Some((key, value)) => params.preset(key, value),
            None => return Err(Error::ParamFileLine(trimmed.to_owned())),
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
