//! Warehouse identifier resolution.
//!
//! A `QualifiedName` is a (schema, table) pair with the configured case
//! folding already applied. Folding is independent of quoting: `Display`
//! renders the unquoted dotted form used in messages and catalog lookups,
//! while [`QualifiedName::quoted`] renders the escaped form embedded in
//! statements.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Case-folding rule applied to table and schema identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseFolding {
    /// Upper-case both table and schema (default)
    #[default]
    Upper,
    /// Lower-case both table and schema
    Lower,
    /// Leave identifiers as written
    Preserve,
}

impl CaseFolding {
    /// Apply this folding rule to a single identifier
    pub fn apply(self, ident: &str) -> String {
        match self {
            CaseFolding::Upper => ident.to_uppercase(),
            CaseFolding::Lower => ident.to_lowercase(),
            CaseFolding::Preserve => ident.to_string(),
        }
    }
}

/// A resolved, case-folded schema-qualified table name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    schema: Option<String>,
    table: String,
}

impl QualifiedName {
    /// Resolve a (table, schema) pair into a qualified name.
    ///
    /// Rejects an empty table name; an empty schema is treated as absent.
    pub fn resolve(table: &str, schema: Option<&str>, folding: CaseFolding) -> CoreResult<Self> {
        if table.is_empty() {
            return Err(CoreError::EmptyIdentifier);
        }
        let schema = schema
            .filter(|s| !s.is_empty())
            .map(|s| folding.apply(s));
        Ok(Self {
            schema,
            table: folding.apply(table),
        })
    }

    /// Table part of the name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Schema part of the name, if qualified
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// A copy of this name with the schema stripped
    pub fn unqualified(&self) -> Self {
        Self {
            schema: None,
            table: self.table.clone(),
        }
    }

    /// Render the quoted form used inside statements
    pub fn quoted(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", quote_ident(schema), quote_ident(&self.table)),
            None => quote_ident(&self.table),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.table),
            None => write!(f, "{}", self.table),
        }
    }
}

/// Quote an identifier for the warehouse (double quotes, `"` doubled)
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_folds_upper_by_default() {
        let name = QualifiedName::resolve("events", Some("raw"), CaseFolding::default()).unwrap();
        assert_eq!(name.table(), "EVENTS");
        assert_eq!(name.schema(), Some("RAW"));
        assert_eq!(name.to_string(), "RAW.EVENTS");
    }

    #[test]
    fn test_resolve_preserve() {
        let name = QualifiedName::resolve("Events", Some("Raw"), CaseFolding::Preserve).unwrap();
        assert_eq!(name.to_string(), "Raw.Events");
    }

    #[test]
    fn test_resolve_lower() {
        let name = QualifiedName::resolve("EVENTS", None, CaseFolding::Lower).unwrap();
        assert_eq!(name.to_string(), "events");
        assert_eq!(name.schema(), None);
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = QualifiedName::resolve("", Some("raw"), CaseFolding::Upper);
        assert!(matches!(err, Err(CoreError::EmptyIdentifier)));
    }

    #[test]
    fn test_empty_schema_treated_as_absent() {
        let name = QualifiedName::resolve("events", Some(""), CaseFolding::Lower).unwrap();
        assert_eq!(name.schema(), None);
        assert_eq!(name.quoted(), "\"events\"");
    }

    #[test]
    fn test_quoting_is_separate_from_folding() {
        let name = QualifiedName::resolve("my table", Some("raw"), CaseFolding::Upper).unwrap();
        assert_eq!(name.quoted(), "\"RAW\".\"MY TABLE\"");
    }

    #[test]
    fn test_embedded_quote_doubled() {
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_unqualified() {
        let name = QualifiedName::resolve("events", Some("raw"), CaseFolding::Lower).unwrap();
        assert_eq!(name.unqualified().quoted(), "\"events\"");
    }
}
