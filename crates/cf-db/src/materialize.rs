//! Query materialization.
//!
//! This is the only place in the core that mutates the warehouse; every
//! other component builds pure relation values.

use crate::error::{DbError, DbResult};
use crate::traits::Warehouse;
use cf_core::QualifiedName;
use cf_sql::{render, Relation};

/// Materialization options
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterializeOptions {
    /// Replace an existing table under the target name
    pub overwrite: bool,
    /// Create a temporary table
    pub temporary: bool,
}

/// A named, persisted table together with the statement that defined it
#[derive(Debug, Clone)]
pub struct TableHandle {
    name: QualifiedName,
    definition: String,
}

impl TableHandle {
    /// Qualified name of the persisted table
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// The SELECT statement the table was created from
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Re-enter the lazy layer: the persisted table as a relation
    pub fn relation(&self) -> Relation {
        Relation::table(self.name.clone())
    }
}

/// Persist `relation` as a table under `target`.
///
/// The existence check happens before anything is rendered or executed:
/// an existing target without `overwrite` fails with
/// [`DbError::TableAlreadyExists`] and issues zero mutating statements.
/// With `overwrite`, the existing table is dropped first. Drop-then-create
/// is not atomic: a create failure after the drop loses the previous
/// table. Callers needing durability must stage into a scratch name and
/// swap.
///
/// Temporary targets are created unqualified; the warehouse places them in
/// its temp namespace.
pub async fn materialize(
    db: &dyn Warehouse,
    relation: &Relation,
    target: &QualifiedName,
    options: MaterializeOptions,
) -> DbResult<TableHandle> {
    let target = if options.temporary {
        target.unqualified()
    } else {
        target.clone()
    };

    let exists = db.relation_exists(&target).await?;
    if exists && !options.overwrite {
        return Err(DbError::TableAlreadyExists(target.to_string()));
    }
    if exists {
        log::debug!("Dropping existing table {}", target);
        db.drop_table(&target).await?;
    }

    let definition = render(relation);
    log::debug!("Materializing {} as: {}", target, definition);
    db.create_table_as(&target, &definition, options.temporary)
        .await?;

    Ok(TableHandle {
        name: target,
        definition,
    })
}

#[cfg(test)]
#[path = "materialize_test.rs"]
mod tests;
