//! Warehouse trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use cf_core::QualifiedName;

/// Sample rows read back from the warehouse
#[derive(Debug, Clone)]
pub struct SampleRows {
    /// Column names in result order
    pub columns: Vec<String>,
    /// Row values rendered as text, `NULL` for absent values
    pub rows: Vec<Vec<String>>,
}

/// Warehouse abstraction for Cohortflow.
///
/// Implementations must be Send + Sync. One statement executes at a time;
/// callers block on the round-trip when a query is forced.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Create a table from a SELECT statement
    async fn create_table_as(
        &self,
        name: &QualifiedName,
        select: &str,
        temporary: bool,
    ) -> DbResult<()>;

    /// Drop a table
    async fn drop_table(&self, name: &QualifiedName) -> DbResult<()>;

    /// Check if a table or view exists under the given name
    async fn relation_exists(&self, name: &QualifiedName) -> DbResult<bool>;

    /// Execute a query and return its row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Execute a query and return up to `limit` rows as text
    async fn query_sample_rows(&self, sql: &str, limit: usize) -> DbResult<SampleRows>;

    /// Create a schema if absent; with `replace`, drop and recreate it,
    /// discarding any tables inside. Idempotent: the no-op "already
    /// exists" path is logged, never an error.
    async fn ensure_schema(&self, name: &str, replace: bool) -> DbResult<()>;

    /// Backend identifier for logging
    fn backend_name(&self) -> &'static str;
}
