//! trasker - an interactive shell for small markdown tasks
//!
//! Keeps one directory per task under `.tasks/` and lists, edits and removes
//! them by their position in the last listing.

use clap::Parser;
use trasker::cli::Cli;
use trasker::output::emit_error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();

    // Tracing is opt-in via RUST_LOG or --verbose.
    // Ignore invalid/huge filters so a stray env var never breaks the shell.
    let default_filter = if cli.verbose { "trasker=debug" } else { "off" };
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(err) = cli.run() {
        emit_error(&err);
        std::process::exit(err.exit_code());
    }
}
