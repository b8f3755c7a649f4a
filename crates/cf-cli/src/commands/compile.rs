//! Compile command implementation

use super::common::{load_config, project_root};
use crate::cli::{CompileArgs, GlobalArgs};
use anyhow::{Context, Result};

/// Execute the compile command
pub async fn execute(args: &CompileArgs, global: &GlobalArgs) -> Result<()> {
    let root = project_root(global);
    let config = load_config(global)?;

    let sql = cf_pipeline::compile(&config, &root)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &sql).with_context(|| format!("Failed to write {}", path))?;
            println!("Wrote compiled SQL to {}", path);
        }
        None => println!("{}", sql),
    }

    Ok(())
}
