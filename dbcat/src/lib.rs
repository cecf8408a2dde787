//! dbcat: instruction-driven document assembler.
//!
//! Interprets a small line-oriented instruction language that sequences
//! file concatenation, literal text emission, and parameter-driven
//! templating, with nested `if`/`else`/`endif` conditionals and per-file
//! command prefixes. Traversal queues output fragments and finalizes
//! parameters; a single deferred substitution pass then materializes the
//! document, so a `set` late in the tree can resolve a placeholder
//! emitted early.
//!
//! # Quick start
//!
//! ```rust
//! use dbcat::params::ParamStore;
//!
//! let mut params = ParamStore::new();
//! params.assign("env", "prod");
//! assert_eq!(params.substitute("deploy-${env}.sql"), "deploy-prod.sql");
//! assert_eq!(params.substitute("${missing} stays"), "${missing} stays");
//! ```

pub mod cli;
pub mod cond;
pub mod directive;
pub mod error;
pub mod params;
pub mod prefix;
pub mod render;
pub mod walker;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

// Re-exports for convenience.
pub use error::{Error, Result};
pub use params::ParamStore;
pub use render::Fragment;
pub use walker::Walker;

/// Walk `instructions`, finalize parameters, and materialize the output.
///
/// The sink is the first `output` directive seen anywhere in the
/// traversed tree, else `flag_output`, else standard output. Returns the
/// path written, or `None` when the result went to stdout. Nothing is
/// created on disk if any part of the run fails.
pub fn run(
    instructions: &Path,
    params: &mut ParamStore,
    flag_output: Option<&Path>,
) -> Result<Option<PathBuf>> {
    let mut fragments = Vec::new();
    let mut dsl_output = None;

    Walker::new(params, &mut fragments, &mut dsl_output).walk_file(instructions)?;

    // All parameters are final: the one deferred substitution pass, over
    // the fragments and the output path alike.
    render::resolve(&mut fragments, params)?;
    let target = match dsl_output
        .map(|p| params.substitute(&p))
        .filter(|p| !p.is_empty())
    {
        Some(path) => Some(PathBuf::from(path)),
        None => flag_output.map(Path::to_path_buf),
    };

    match &target {
        Some(path) => {
            let file = File::create(path).map_err(|e| Error::CreateOutput {
                path: path.clone(),
                source: e,
            })?;
            let mut out = BufWriter::new(file);
            render::write_all(&fragments, &mut out)?;
            out.flush().map_err(Error::WriteOutput)?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            render::write_all(&fragments, &mut out)?;
            out.flush().map_err(Error::WriteOutput)?;
        }
    }
    Ok(target)
}
