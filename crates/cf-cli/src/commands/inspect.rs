//! Inspect command implementation

use super::common::{connect, load_config, project_root};
use crate::cli::{GlobalArgs, InspectArgs};
use anyhow::Result;
use cf_core::QualifiedName;
use cf_pipeline::Pipeline;

/// Execute the inspect command
pub async fn execute(args: &InspectArgs, global: &GlobalArgs) -> Result<()> {
    let root = project_root(global);
    let config = load_config(global)?;
    let db = connect(&config, global)?;

    let name = match &args.table {
        Some(table) => {
            // Accept either a bare table or a schema.table pair.
            match table.split_once('.') {
                Some((schema, table)) => {
                    QualifiedName::resolve(table, Some(schema), config.identifier_case)?
                }
                None => QualifiedName::resolve(table, config.schema.as_deref(), config.identifier_case)?,
            }
        }
        None => Pipeline::new(config.clone(), &root, db.clone()).target()?,
    };

    if !db.relation_exists(&name).await? {
        anyhow::bail!("Table {} does not exist; run the pipeline first", name);
    }

    let sample = db
        .query_sample_rows(&format!("SELECT * FROM {}", name.quoted()), args.limit)
        .await?;

    println!("{}", sample.columns.join(" | "));
    for row in &sample.rows {
        println!("{}", row.join(" | "));
    }
    println!("({} rows shown)", sample.rows.len());

    Ok(())
}
