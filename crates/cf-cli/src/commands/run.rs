//! Run command implementation

use super::common::{connect, load_config, project_root};
use crate::cli::{GlobalArgs, RunArgs};
use anyhow::{Context, Result};
use cf_pipeline::Pipeline;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Run results output file format
#[derive(Debug, Serialize)]
struct RunResults {
    timestamp: DateTime<Utc>,
    elapsed_secs: f64,
    target: String,
    row_count: usize,
}

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let start_time = Instant::now();
    let root = project_root(global);
    let config = load_config(global)?;
    let db = connect(&config, global)?;

    if global.verbose {
        eprintln!(
            "[verbose] Running pipeline '{}' with {} sources and {} codelists",
            config.name,
            config.sources.len(),
            config.codelists.len()
        );
    }

    let pipeline = Pipeline::new(config, &root, db);
    let outcome = pipeline
        .run(args.overwrite.then_some(true), args.temporary.then_some(true))
        .await?;

    let elapsed = start_time.elapsed().as_secs_f64();
    println!(
        "Materialized {} ({} rows) in {:.2}s",
        outcome.handle.name(),
        outcome.row_count,
        elapsed
    );

    let results = RunResults {
        timestamp: Utc::now(),
        elapsed_secs: elapsed,
        target: outcome.handle.name().to_string(),
        row_count: outcome.row_count,
    };
    write_run_results(&root, &results)?;

    Ok(())
}

/// Write the run summary to target/run_results.json
fn write_run_results(root: &Path, results: &RunResults) -> Result<()> {
    let target_dir = root.join("target");
    std::fs::create_dir_all(&target_dir)
        .with_context(|| format!("Failed to create {}", target_dir.display()))?;
    let path = target_dir.join("run_results.json");
    std::fs::write(&path, serde_json::to_string_pretty(results)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
