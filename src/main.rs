use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use choromap::cli::{Cli, Commands};
use choromap::commands;

/// Log to stderr; `RUST_LOG` overrides the level picked by `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Commands::Metrics(args) => commands::metrics(&cli, args),
        Commands::Render(args) => commands::render(&cli, args),
    }
}
