//! Codelist command implementation

use super::common::{connect, load_config, project_root};
use crate::cli::{CodelistArgs, GlobalArgs};
use anyhow::Result;
use cf_core::Codelist;
use cf_pipeline::stage_codelist;
use std::collections::HashSet;

/// Execute the codelist command
pub async fn execute(args: &CodelistArgs, global: &GlobalArgs) -> Result<()> {
    let root = project_root(global);
    let config = load_config(global)?;

    let filter: Option<HashSet<&str>> = args
        .codelists
        .as_ref()
        .map(|names| names.split(',').map(str::trim).collect());

    let selected: Vec<_> = config
        .codelists
        .iter()
        .filter(|declared| {
            filter
                .as_ref()
                .map_or(true, |names| names.contains(declared.name.as_str()))
        })
        .collect();

    if selected.is_empty() {
        println!("No matching codelists declared.");
        return Ok(());
    }

    let db = if args.check {
        None
    } else {
        Some(connect(&config, global)?)
    };

    if let (Some(db), Some(schema)) = (&db, config.schema.as_deref()) {
        db.ensure_schema(schema, false).await?;
    }

    for declared in selected {
        let path = if declared.path.is_absolute() {
            declared.path.clone()
        } else {
            root.join(&declared.path)
        };
        let codelist = Codelist::load(&declared.name, &path)?;
        let phenotypes = codelist.phenotypes();

        match &db {
            Some(db) => {
                let name = stage_codelist(
                    db.as_ref(),
                    &codelist,
                    config.schema.as_deref(),
                    config.identifier_case,
                )
                .await?;
                println!(
                    "Staged '{}' as {} ({} entries, {} phenotypes)",
                    codelist.name,
                    name,
                    codelist.len(),
                    phenotypes.len()
                );
            }
            None => println!(
                "Validated '{}' ({} entries, {} phenotypes: {})",
                codelist.name,
                codelist.len(),
                phenotypes.len(),
                phenotypes.join(", ")
            ),
        }
    }

    Ok(())
}
