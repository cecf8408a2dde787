//! Recursive instruction-file traversal.
//!
//! The [`Walker`] owns nothing: it borrows the run-wide parameter store,
//! fragment list, and output-path slot, and threads them through every
//! `include`. What is *not* shared is per-file: each [`Walker::walk_file`]
//! call builds its own prefix scope, conditional stack, and text-block
//! state, so an included file can never leak a prefix or close its
//! caller's `if`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::cond::CondStack;
use crate::directive;
use crate::error::{Error, Result};
use crate::params::ParamStore;
use crate::prefix::{Gate, PrefixScope};
use crate::render::Fragment;

/// The recursive driver for one run.
pub struct Walker<'a> {
    params: &'a mut ParamStore,
    fragments: &'a mut Vec<Fragment>,
    output: &'a mut Option<String>,
}

impl<'a> Walker<'a> {
    pub fn new(
        params: &'a mut ParamStore,
        fragments: &'a mut Vec<Fragment>,
        output: &'a mut Option<String>,
    ) -> Self {
        Self {
            params,
            fragments,
            output,
        }
    }

    /// Walk one instruction file line by line, dispatching directives
    /// and recursing into `include`d files. Relative `concat` paths
    /// recorded here resolve against this file's own directory.
    pub fn walk_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|e| Error::ReadInstructions {
            path: path.to_path_buf(),
            source: e,
        })?;
        let base_dir = parent_dir(path);

        let mut prefix = PrefixScope::new();
        let mut conds = CondStack::new();
        let mut block: Option<String> = None;

        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| Error::ReadInstructions {
                path: path.to_path_buf(),
                source: e,
            })?;

            // Inside a text block every physical line is buffered
            // verbatim until the (prefix-stripped) `text-end` marker.
            if let Some(mut buffer) = block.take() {
                if prefix.strip_marker(line.trim()) == "text-end" {
                    self.fragments.push(Fragment::Text(buffer));
                } else {
                    buffer.push_str(&line);
                    buffer.push('\n');
                    block = Some(buffer);
                }
                continue;
            }

            let trimmed = line.trim();
            if directive::is_skippable(trimmed) {
                continue;
            }

            let stripped = match prefix.gate(trimmed) {
                Gate::Run(rest) => rest,
                Gate::Cleared | Gate::Dropped => continue,
            };

            let (command, args) = directive::split_command(stripped);

            // Conditional bookkeeping and prefix retargeting run even
            // while suppressed, so nesting and scoping stay consistent.
            match command {
                "if" => {
                    conds.begin_if(args, self.params)?;
                    continue;
                }
                "else" => {
                    conds.begin_else()?;
                    continue;
                }
                "endif" => {
                    conds.end_if()?;
                    continue;
                }
                "set-prefix" => {
                    prefix.set(args);
                    continue;
                }
                _ => {}
            }

            if conds.suppressed() {
                continue;
            }

            match command {
                "output" => {
                    // First one anywhere in the traversed tree wins.
                    if self.output.is_none() && !args.is_empty() {
                        *self.output = Some(args.to_owned());
                    }
                }
                "concat" => self.fragments.push(Fragment::File {
                    path: args.to_owned(),
                    base_dir: base_dir.clone(),
                }),
                "include" => {
                    // Include paths must resolve now, so they get eager
                    // substitution with the parameters known so far.
                    let target = self.params.substitute(args);
                    self.walk_file(&resolve_relative(&target, &base_dir))?;
                }
                "param" => {
                    let (key, value) =
                        directive::split_kv(args).ok_or_else(|| Error::InvalidKeyValue {
                            command: "param",
                            args: args.to_owned(),
                        })?;
                    self.params.define(key, value);
                }
                "set" => {
                    let (key, value) =
                        directive::split_kv(args).ok_or_else(|| Error::InvalidKeyValue {
                            command: "set",
                            args: args.to_owned(),
                        })?;
                    self.params.assign(key, value);
                }
                "print" => self.fragments.push(Fragment::Print(args.to_owned())),
                "emit" => self.fragments.push(Fragment::Text(args.to_owned())),
                "text-begin" => block = Some(String::new()),
                other => return Err(Error::UnknownCommand(other.to_owned())),
            }
        }

        if !conds.is_balanced() {
            return Err(Error::UnclosedIf {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}

fn resolve_relative(target: &str, base_dir: &Path) -> PathBuf {
    let target = Path::new(target);
    if target.is_absolute() {
        target.to_path_buf()
    } else {
        base_dir.join(target)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if dir != Path::new("") => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
