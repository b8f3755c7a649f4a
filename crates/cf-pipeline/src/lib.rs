//! cf-pipeline - Event extraction and aggregation for Cohortflow
//!
//! Builds the covariate query out of lazy relations: per-source event
//! extraction against staged codelists, first-event-per-phenotype
//! aggregation over the study window, and the end-to-end pipeline that
//! stages, aggregates, and materializes.

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod stage;

pub use aggregate::{covariates, first_events, Cohort};
pub use error::{PipelineError, PipelineResult};
pub use extract::extract_events;
pub use pipeline::{compile, Pipeline, RunOutcome};
pub use stage::stage_codelist;
