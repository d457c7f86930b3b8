//! AnyCache CLI - inspect and edit on-disk cache namespaces
//!
//! Parses arguments, sets up logging, and dispatches to [`anycache::cli::execute`].

use anycache::cli::{execute, Cli, Outcome};
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("anycache=warn"),
        1 => EnvFilter::new("anycache=info"),
        _ => EnvFilter::new("anycache=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cache = cli.open_cache();
    debug!("Using cache directory {:?}", cache.directory());

    let mut stdout = io::stdout().lock();
    match execute(&cache, &cli.command, &mut stdout) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Missing) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
