//! Crate-wide error type.
//!
//! Every failure aborts the whole run; there is no recovery or retry, so
//! one flat enum covers the instruction language, the parameter sources,
//! and the I/O surface. Messages are what the operator sees verbatim.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A directive keyword no dispatch arm recognizes.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// `param` or `set` whose remainder carries no `=`.
    #[error("invalid {command} command format: {args}")]
    InvalidKeyValue { command: &'static str, args: String },

    /// An `if` condition matching none of the comparison operators.
    #[error("invalid condition format: {0}")]
    InvalidCondition(String),

    #[error("else without a preceding if")]
    DanglingElse,

    #[error("endif without a preceding if")]
    DanglingEndif,

    /// Non-empty conditional stack when a file's traversal ends. Each
    /// file's nesting is self-contained; an include cannot close it.
    #[error("unclosed if block(s) in {path}")]
    UnclosedIf { path: PathBuf },

    /// `print` naming a parameter with no value at final-substitution
    /// time. Unresolved `${KEY}` placeholders elsewhere are not errors.
    #[error("print of undefined parameter: {0}")]
    UndefinedPrint(String),

    #[error("error opening instructions file {path}: {source}")]
    ReadInstructions { path: PathBuf, source: io::Error },

    #[error("error opening file {path}: {source}")]
    ReadSource { path: PathBuf, source: io::Error },

    #[error("error copying from {path}: {source}")]
    CopySource { path: PathBuf, source: io::Error },

    #[error("error creating output file {path}: {source}")]
    CreateOutput { path: PathBuf, source: io::Error },

    #[error("error writing to output: {0}")]
    WriteOutput(#[source] io::Error),

    #[error("error opening parameter file {path}: {source}")]
    ReadParamFile { path: PathBuf, source: io::Error },

    #[error("invalid parameter file line format: {0}")]
    ParamFileLine(String),
}

pub type Result<T> = std::result::Result<T, Error>;
