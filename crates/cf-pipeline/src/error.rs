//! Error types for cf-pipeline

use cf_core::CoreError;
use cf_db::DbError;
use thiserror::Error;

/// Pipeline error type
#[derive(Error, Debug)]
pub enum PipelineError {
    /// P001: a source references a codelist the project does not declare
    #[error("[P001] Source '{source_name}' references unknown codelist '{codelist}'")]
    UnknownCodelist { source_name: String, codelist: String },

    /// P002: nothing to aggregate
    #[error("[P002] Project declares no event sources")]
    NoSources,

    /// Core error
    #[error("{0}")]
    Core(#[from] CoreError),

    /// Warehouse error
    #[error("{0}")]
    Db(#[from] DbError),
}

/// Result type alias for PipelineError
pub type PipelineResult<T> = Result<T, PipelineError>;
