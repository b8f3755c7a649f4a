//! cf-db - Warehouse abstraction layer for Cohortflow
//!
//! This crate provides the `Warehouse` trait, its DuckDB implementation,
//! and the query materializer that persists a lazy relation as a named
//! table.

pub mod duckdb;
pub mod error;
pub mod materialize;
pub mod traits;

pub use duckdb::DuckDbWarehouse;
pub use error::{DbError, DbResult};
pub use materialize::{materialize, MaterializeOptions, TableHandle};
pub use traits::{SampleRows, Warehouse};
