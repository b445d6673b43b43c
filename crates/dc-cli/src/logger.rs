//! Logger setup for the CLI.

use log::LevelFilter;

/// Map `-v` / `-q` flags to a level. Info by default.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install `env_logger`. `RUST_LOG` applies unless a flag was given.
pub fn init_logger(verbose: u8, quiet: bool) -> Result<(), String> {
    let mut builder = env_logger::Builder::from_default_env();

    if verbose > 0 || quiet || std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level_for(verbose, quiet));
    }
    builder.format_timestamp_secs().format_target(false);

    builder
        .try_init()
        .map_err(|e| format!("Failed to initialize logger: {}", e))
}
