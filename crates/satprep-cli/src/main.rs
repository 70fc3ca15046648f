//! satprep CLI
//!
//! Builds a vector index from SAT math PDFs and generates practice
//! questions grounded in it.

use anyhow::Result;
use clap::Parser;
use satprep_core::error::exit_codes;
use satprep_core::{Config, SatPrepError};

mod app;
mod commands;
mod output;
mod progress;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<SatPrepError>()
            .map(SatPrepError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(Some(config_path.as_path()))?;

    match cli.command {
        Commands::Ingest(args) => commands::ingest::run(args, config, cli.format).await,
        Commands::Generate(args) => commands::generate::run(args, config, cli.format).await,
        Commands::Config(args) => commands::config::run(args, &config, &config_path, cli.format),
    }
}
