//! Shared command helpers

use crate::cli::GlobalArgs;
use anyhow::{Context, Result};
use cf_core::Config;
use cf_db::{DuckDbWarehouse, Warehouse};
use std::path::PathBuf;
use std::sync::Arc;

/// Default project config file name
pub const DEFAULT_CONFIG_FILE: &str = "cohortflow.yml";

/// The project directory
pub fn project_root(global: &GlobalArgs) -> PathBuf {
    PathBuf::from(&global.project_dir)
}

/// Load the project configuration, honoring the --config override
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let path = match &global.config {
        Some(path) => PathBuf::from(path),
        None => project_root(global).join(DEFAULT_CONFIG_FILE),
    };
    Config::from_file(&path)
        .with_context(|| format!("Failed to load project config from {}", path.display()))
}

/// Open the warehouse, honoring the --target override
pub fn connect(config: &Config, global: &GlobalArgs) -> Result<Arc<dyn Warehouse>> {
    let path = global.target.as_ref().unwrap_or(&config.warehouse.path);
    if global.verbose {
        eprintln!("[verbose] Connecting to duckdb warehouse at {}", path);
    }
    let db = DuckDbWarehouse::new(path).context("Failed to connect to warehouse")?;
    Ok(Arc::new(db))
}
