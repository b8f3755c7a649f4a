//! Event source declarations.
//!
//! Raw source tables disagree on column names for the same logical fields,
//! so each source declares its own mapping from logical field to raw column.

use serde::{Deserialize, Serialize};

/// Raw column names supplying the canonical event fields for one source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnMapping {
    /// Column holding the subject identifier
    pub subject_id: String,
    /// Column holding the clinical code
    pub code: String,
    /// Column holding the event date
    pub event_date: String,
}

/// One raw event table declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Source name, attached to every extracted event
    pub name: String,

    /// Warehouse table holding the raw rows
    pub table: String,

    /// Schema of the raw table (default: unqualified)
    #[serde(default)]
    pub schema: Option<String>,

    /// Tie-break rank between sources; lower is preferred
    pub priority: u32,

    /// Name of the codelist this source is matched against
    pub codelist: String,

    /// Raw column names for the canonical event fields
    pub columns: ColumnMapping,

    /// Fixed-width truncation applied to this source's codes before matching
    #[serde(default)]
    pub code_width: Option<usize>,
}
