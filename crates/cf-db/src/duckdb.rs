//! DuckDB warehouse backend

use crate::error::{DbError, DbResult};
use crate::traits::{SampleRows, Warehouse};
use async_trait::async_trait;
use cf_core::QualifiedName;
use duckdb::types::Value;
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB warehouse backend
pub struct DuckDbWarehouse {
    conn: Mutex<Connection>,
}

impl DuckDbWarehouse {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from a path string (handles the :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    fn schema_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.schemata WHERE schema_name = ?",
                params![name],
                |row| row.get(0),
            )
            .map_err(DbError::from)?;
        Ok(count > 0)
    }
}

#[async_trait]
impl Warehouse for DuckDbWarehouse {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    async fn create_table_as(
        &self,
        name: &QualifiedName,
        select: &str,
        temporary: bool,
    ) -> DbResult<()> {
        let sql = format!(
            "CREATE {}TABLE {} AS ({})",
            if temporary { "TEMPORARY " } else { "" },
            name.quoted(),
            select
        );
        self.execute_sync(&sql)?;
        Ok(())
    }

    async fn drop_table(&self, name: &QualifiedName) -> DbResult<()> {
        self.execute_sync(&format!("DROP TABLE {}", name.quoted()))?;
        Ok(())
    }

    async fn relation_exists(&self, name: &QualifiedName) -> DbResult<bool> {
        let conn = self.lock()?;

        // Unqualified names may live in the default schema or, for
        // temporary tables, in DuckDB's temp schema.
        let (sql, schema) = match name.schema() {
            Some(schema) => (
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = ? AND table_name = ?",
                schema,
            ),
            None => (
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema IN ('main', 'temp') AND table_name = ?",
                "",
            ),
        };

        let count: i64 = if schema.is_empty() {
            conn.query_row(sql, params![name.table()], |row| row.get(0))
        } else {
            conn.query_row(sql, params![schema, name.table()], |row| row.get(0))
        }
        .map_err(DbError::from)?;

        Ok(count > 0)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM ({})", sql), [], |row| {
                row.get(0)
            })
            .map_err(DbError::from)?;
        Ok(count as usize)
    }

    async fn query_sample_rows(&self, sql: &str, limit: usize) -> DbResult<SampleRows> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("SELECT * FROM ({}) LIMIT {}", sql, limit))
            .map_err(DbError::from)?;

        let mut rows_out = Vec::new();
        let mut rows = stmt.query([]).map_err(DbError::from)?;
        while let Some(row) = rows.next().map_err(DbError::from)? {
            let mut fields = Vec::new();
            let mut idx = 0;
            loop {
                match row.get::<_, Value>(idx) {
                    Ok(value) => fields.push(format_value(&value)),
                    Err(_) => break,
                }
                idx += 1;
            }
            rows_out.push(fields);
        }
        drop(rows);

        let columns = stmt.column_names().iter().map(|c| c.to_string()).collect();
        Ok(SampleRows {
            columns,
            rows: rows_out,
        })
    }

    async fn ensure_schema(&self, name: &str, replace: bool) -> DbResult<()> {
        let quoted = cf_core::identifier::quote_ident(name);
        if replace {
            self.execute_sync(&format!("DROP SCHEMA IF EXISTS {} CASCADE", quoted))?;
            self.execute_sync(&format!("CREATE SCHEMA {}", quoted))?;
            return Ok(());
        }
        if self.schema_exists_sync(name)? {
            log::info!("Schema '{}' already exists", name);
            return Ok(());
        }
        self.execute_sync(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "duckdb"
    }
}

/// Render one result value as display text
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::TinyInt(n) => n.to_string(),
        Value::SmallInt(n) => n.to_string(),
        Value::Int(n) => n.to_string(),
        Value::BigInt(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Double(n) => n.to_string(),
        Value::Text(s) => s.clone(),
        Value::Date32(days) => {
            match chrono::NaiveDate::default().checked_add_signed(chrono::Duration::days(*days as i64)) {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => format!("{:?}", value),
            }
        }
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
