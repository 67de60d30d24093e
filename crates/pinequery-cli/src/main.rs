//! PineQuery CLI
//!
//! Natural-language search over a Pinecone index.

use anyhow::Result;
use clap::Parser;
use pinequery_core::{Config, PineQueryError};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = default_log_level(&cli);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<PineQueryError>()
            .map(PineQueryError::exit_code)
            .unwrap_or(pinequery_core::error::exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

/// One-shot commands stay quiet; the server reports startup and requests
fn default_log_level(cli: &Cli) -> tracing::Level {
    if cli.verbose {
        tracing::Level::DEBUG
    } else if matches!(cli.command, Commands::Serve(_)) {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Parse(args) => {
            commands::query::run_parse(args, &config, &cli.provider, cli.format).await
        }
        Commands::Search(args) => {
            commands::query::run_search(args, &config, &cli.provider, cli.format).await
        }
        Commands::Ask(args) => {
            commands::query::run_ask(args, &config, &cli.provider, cli.format).await
        }
        Commands::Providers => commands::providers::run(&config, cli.format),
        Commands::Serve(args) => commands::serve::run(args, config).await,
    }
}
