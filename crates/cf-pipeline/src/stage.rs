//! Codelist staging.
//!
//! Validated codelists are written into the warehouse so extraction can
//! join against them. Rows were already converted client-side, so staging
//! is plain DDL plus VALUES inserts rather than a CSV re-read.

use crate::error::PipelineResult;
use cf_core::identifier::quote_ident;
use cf_core::{CaseFolding, Codelist, QualifiedName};
use cf_db::Warehouse;

/// Staged codelist tables are named `codelist_<name>`
pub const CODELIST_TABLE_PREFIX: &str = "codelist_";

/// Rows per INSERT statement
const INSERT_CHUNK: usize = 500;

/// Stage a codelist into the warehouse, replacing any previous staging.
///
/// Returns the staged table's qualified name.
pub async fn stage_codelist(
    db: &dyn Warehouse,
    codelist: &Codelist,
    schema: Option<&str>,
    folding: CaseFolding,
) -> PipelineResult<QualifiedName> {
    let name = staged_name(codelist, schema, folding)?;

    let ddl_columns = codelist
        .columns
        .iter()
        .map(|(column, column_type)| format!("{} {}", quote_ident(column), column_type.sql_type()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut batch = format!(
        "CREATE OR REPLACE TABLE {} ({});\n",
        name.quoted(),
        ddl_columns
    );
    for chunk in codelist.rows.chunks(INSERT_CHUNK) {
        let values = chunk
            .iter()
            .map(|row| {
                format!(
                    "({})",
                    row.iter()
                        .map(|value| value.sql_literal())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        batch.push_str(&format!("INSERT INTO {} VALUES {};\n", name.quoted(), values));
    }

    db.execute_batch(&batch).await?;
    log::info!(
        "Staged codelist '{}' as {} ({} entries)",
        codelist.name,
        name,
        codelist.len()
    );
    Ok(name)
}

/// The qualified name staging would use, without touching the warehouse
pub fn staged_name(
    codelist: &Codelist,
    schema: Option<&str>,
    folding: CaseFolding,
) -> PipelineResult<QualifiedName> {
    let table = format!("{}{}", CODELIST_TABLE_PREFIX, codelist.name);
    Ok(QualifiedName::resolve(&table, schema, folding)?)
}
