mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Essentiality(args) => {
            let tables = commands::run_essentiality(args)?;
            for table in tables {
                info!("Wrote {}", table.display());
            }
        }
        Commands::Plasmid(args) => {
            commands::run_plasmid(args)?;
        }
    }
    Ok(())
}
