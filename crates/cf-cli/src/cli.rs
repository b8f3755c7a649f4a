//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Cohortflow - derive per-subject first-event covariates from a clinical warehouse
#[derive(Parser, Debug)]
#[command(name = "cf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override warehouse path
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute the pipeline and materialize the covariate table
    Run(RunArgs),

    /// Print the covariate SQL without executing it
    Compile(CompileArgs),

    /// Load, validate, and stage codelists
    Codelist(CodelistArgs),

    /// Show sample rows from a materialized table
    Inspect(InspectArgs),
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Replace the target table if it exists
    #[arg(long)]
    pub overwrite: bool,

    /// Materialize into a temporary table
    #[arg(long)]
    pub temporary: bool,
}

/// Arguments for the compile command
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Write the SQL to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the codelist command
#[derive(Args, Debug)]
pub struct CodelistArgs {
    /// Validate without staging into the warehouse
    #[arg(long)]
    pub check: bool,

    /// Codelist names to load (comma-separated, default: all)
    #[arg(long)]
    pub codelists: Option<String>,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Table to inspect (default: the configured output table)
    #[arg(long)]
    pub table: Option<String>,

    /// Maximum rows to print
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}
