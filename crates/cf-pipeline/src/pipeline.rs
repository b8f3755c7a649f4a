//! End-to-end pipeline orchestration.
//!
//! Everything up to materialization is pure query building; the warehouse
//! is touched only to ensure schemas, stage codelists, and execute the one
//! composed statement at the materialize boundary. [`compile`] runs the
//! pure half on its own, without a connection.

use crate::aggregate::{covariates, Cohort};
use crate::error::{PipelineError, PipelineResult};
use crate::extract::extract_events;
use crate::stage::{stage_codelist, staged_name};
use cf_core::{Codelist, Config, QualifiedName};
use cf_db::{materialize, MaterializeOptions, TableHandle, Warehouse};
use cf_sql::{render, Relation};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of a pipeline run
#[derive(Debug)]
pub struct RunOutcome {
    /// Handle to the materialized covariate table
    pub handle: TableHandle,
    /// Rows in the materialized table (equals the subject count)
    pub row_count: usize,
}

/// Render the covariate statement for a project without touching the
/// warehouse. `root` anchors relative codelist paths.
pub fn compile(config: &Config, root: &Path) -> PipelineResult<String> {
    let codelists = load_codelists(config, root)?;
    let staged = staged_names(config, &codelists)?;
    Ok(render(&build_query(config, &codelists, &staged)?))
}

/// The end-to-end covariate pipeline
pub struct Pipeline {
    config: Config,
    root: PathBuf,
    db: Arc<dyn Warehouse>,
}

impl Pipeline {
    /// Build a pipeline over a loaded configuration.
    ///
    /// `root` anchors relative codelist paths (usually the project
    /// directory).
    pub fn new(config: Config, root: impl Into<PathBuf>, db: Arc<dyn Warehouse>) -> Self {
        Self {
            config,
            root: root.into(),
            db,
        }
    }

    /// The configured project
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load and validate every declared codelist
    pub fn load_codelists(&self) -> PipelineResult<Vec<Codelist>> {
        load_codelists(&self.config, &self.root)
    }

    /// Resolved materialization target
    pub fn target(&self) -> PipelineResult<QualifiedName> {
        let schema = self
            .config
            .output
            .schema
            .as_deref()
            .or(self.config.schema.as_deref());
        Ok(QualifiedName::resolve(
            &self.config.output.table,
            schema,
            self.config.identifier_case,
        )?)
    }

    /// Render the covariate statement without touching the warehouse
    pub fn compile(&self) -> PipelineResult<String> {
        compile(&self.config, &self.root)
    }

    /// Execute the pipeline: ensure schemas, stage codelists, and
    /// materialize the covariate table.
    ///
    /// `overwrite`/`temporary` override the configured output policy when
    /// given.
    pub async fn run(
        &self,
        overwrite: Option<bool>,
        temporary: Option<bool>,
    ) -> PipelineResult<RunOutcome> {
        let mut schemas: Vec<&str> = [
            self.config.schema.as_deref(),
            self.config.output.schema.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        schemas.dedup();
        for schema in schemas {
            self.db.ensure_schema(schema, false).await?;
        }

        let codelists = self.load_codelists()?;
        let mut staged = HashMap::new();
        for codelist in &codelists {
            let name = stage_codelist(
                self.db.as_ref(),
                codelist,
                self.config.schema.as_deref(),
                self.config.identifier_case,
            )
            .await?;
            staged.insert(codelist.name.clone(), name);
        }

        let query = build_query(&self.config, &codelists, &staged)?;
        let target = self.target()?;
        let options = MaterializeOptions {
            overwrite: overwrite.unwrap_or(self.config.output.overwrite),
            temporary: temporary.unwrap_or(self.config.output.temporary),
        };

        log::info!("Materializing covariates into {}", target);
        let handle = materialize(self.db.as_ref(), &query, &target, options).await?;
        let row_count = self
            .db
            .query_count(&format!("SELECT * FROM {}", handle.name().quoted()))
            .await?;
        log::info!("Materialized {} ({} rows)", handle.name(), row_count);

        Ok(RunOutcome { handle, row_count })
    }
}

fn load_codelists(config: &Config, root: &Path) -> PipelineResult<Vec<Codelist>> {
    config
        .codelists
        .iter()
        .map(|declared| {
            let path = if declared.path.is_absolute() {
                declared.path.clone()
            } else {
                root.join(&declared.path)
            };
            Ok(Codelist::load(&declared.name, &path)?)
        })
        .collect()
}

fn staged_names(
    config: &Config,
    codelists: &[Codelist],
) -> PipelineResult<HashMap<String, QualifiedName>> {
    codelists
        .iter()
        .map(|codelist| {
            Ok((
                codelist.name.clone(),
                staged_name(codelist, config.schema.as_deref(), config.identifier_case)?,
            ))
        })
        .collect()
}

fn build_query(
    config: &Config,
    codelists: &[Codelist],
    staged: &HashMap<String, QualifiedName>,
) -> PipelineResult<Relation> {
    if config.sources.is_empty() {
        return Err(PipelineError::NoSources);
    }
    let folding = config.identifier_case;

    let cohort_name = QualifiedName::resolve(
        &config.cohort.table,
        config.cohort.schema.as_deref(),
        folding,
    )?;
    let cohort = Cohort::new(Relation::table(cohort_name), &config.cohort.columns);

    let mut events = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        let codelist_table =
            staged
                .get(&source.codelist)
                .ok_or_else(|| PipelineError::UnknownCodelist {
                    source_name: source.name.clone(),
                    codelist: source.codelist.clone(),
                })?;
        let source_name = QualifiedName::resolve(&source.table, source.schema.as_deref(), folding)?;
        events.push(extract_events(
            Relation::table(source_name),
            Relation::table(codelist_table.clone()),
            &source.columns,
            &source.name,
            source.priority,
            source.code_width,
        ));
    }

    let mut phenotypes: Vec<String> = codelists
        .iter()
        .flat_map(|codelist| codelist.phenotypes())
        .collect();
    phenotypes.sort();
    phenotypes.dedup();

    Ok(covariates(events, &cohort, &phenotypes))
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
