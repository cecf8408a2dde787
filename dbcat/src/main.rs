use std::process;

use dbcat::cli;
use dbcat::params::ParamStore;

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("dbcat: {e}");
            eprintln!(
                "Usage: dbcat [--param-file <files>] [--param <key=value>]... \
                 [--output <path>] <instructions_file>"
            );
            process::exit(1);
        }
    };

    // ── Build the parameter store ─────────────────────────────────────────────
    // Parameter files first (lowest precedence), then --param flags,
    // which lock their keys against every in-DSL write.
    let mut params = ParamStore::new();
    for file in &args.param_files {
        if let Err(e) = cli::load_param_file(file, &mut params) {
            eprintln!("dbcat: {e}");
            process::exit(1);
        }
    }
    for (key, value) in &args.params {
        params.lock(key, value);
    }

    // ── Walk, resolve, materialize ────────────────────────────────────────────
    match dbcat::run(&args.instructions, &mut params, args.output.as_deref()) {
        // Keep stdout clean when it is the sink itself.
        Ok(Some(path)) => println!("Assembled output written to {}.", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("dbcat: {e}");
            process::exit(1);
        }
    }
}
