//! Cohortflow CLI - derive per-subject first-event covariates from a
//! clinical warehouse

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{codelist, compile, inspect, run};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Run(args) => run::execute(args, &cli.global).await,
        cli::Commands::Compile(args) => compile::execute(args, &cli.global).await,
        cli::Commands::Codelist(args) => codelist::execute(args, &cli.global).await,
        cli::Commands::Inspect(args) => inspect::execute(args, &cli.global).await,
    }
}
