//! cf-core - Core library for Cohortflow
//!
//! This crate provides the project configuration, the identifier resolver,
//! the declared column-type set with its conversion rules, and codelist
//! loading/validation used across all Cohortflow components.

pub mod codelist;
pub mod column_type;
pub mod config;
pub mod error;
pub mod identifier;
pub mod source;

pub use codelist::{Codelist, CodelistEntry, CodelistSpec};
pub use column_type::{CellValue, ColumnType};
pub use config::{CodelistConfig, CohortColumns, CohortConfig, Config, OutputConfig, WarehouseConfig};
pub use error::{CoreError, CoreResult};
pub use identifier::{CaseFolding, QualifiedName};
pub use source::{ColumnMapping, SourceConfig};
