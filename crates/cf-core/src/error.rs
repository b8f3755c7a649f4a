//! Error types for cf-core

use thiserror::Error;

/// Core error type for Cohortflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Codelist file not found
    #[error("[E003] Codelist file not found: {path}")]
    CodelistNotFound { path: String },

    /// E004: Codelist header does not match its declared columns
    #[error("[E004] Codelist '{file}' does not match its declared columns (missing: [{missing}], unexpected: [{unexpected}])")]
    SchemaMismatch {
        file: String,
        missing: String,
        unexpected: String,
    },

    /// E005: A declared column type has no conversion rule
    #[error("[E005] Unknown column type '{declared}' for column '{column}' in {file}")]
    UnknownColumnType {
        file: String,
        column: String,
        declared: String,
    },

    /// E006: A value failed conversion to its declared type
    #[error("[E006] Cannot convert '{value}' to {target} for column '{column}' in {file}: {message}")]
    TypeConversion {
        file: String,
        column: String,
        value: String,
        target: String,
        message: String,
    },

    /// E007: A codelist row has the wrong number of fields
    #[error("[E007] Row {line} of {file} has {found} fields, expected {expected}")]
    RowShape {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// E008: Empty identifier passed to the resolver
    #[error("[E008] Table identifier must not be empty")]
    EmptyIdentifier,

    /// E009: IO error
    #[error("[E009] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E010: IO error with file path context
    #[error("[E010] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E011: YAML parse error
    #[error("[E011] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
