//! Configuration types and parsing for cohortflow.yml
//!
//! The parsed `Config` is immutable and passed by reference into every
//! component; there is no process-wide naming state.

use crate::error::{CoreError, CoreResult};
use crate::identifier::CaseFolding;
use crate::source::SourceConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Main project configuration from cohortflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Warehouse connection configuration
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// Schema that staged codelists and the output table land in
    #[serde(default)]
    pub schema: Option<String>,

    /// Case folding applied to all warehouse identifiers
    #[serde(default)]
    pub identifier_case: CaseFolding,

    /// Codelist declarations
    #[serde(default)]
    pub codelists: Vec<CodelistConfig>,

    /// Event source declarations
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    /// Cohort table declaration
    pub cohort: CohortConfig,

    /// Materialization target
    pub output: OutputConfig,
}

/// Warehouse connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarehouseConfig {
    /// Database path, or `:memory:`
    #[serde(default = "default_warehouse_path")]
    pub path: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            path: default_warehouse_path(),
        }
    }
}

/// One declared codelist file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodelistConfig {
    /// Codelist name, referenced by sources
    pub name: String,
    /// Path to the CSV file (sidecar .yml picked up automatically)
    pub path: PathBuf,
}

/// Cohort (subject) table declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CohortConfig {
    /// Warehouse table holding one row per subject
    pub table: String,

    /// Schema of the cohort table (default: unqualified)
    #[serde(default)]
    pub schema: Option<String>,

    /// Cohort column names
    pub columns: CohortColumns,
}

/// Column names in the cohort table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CohortColumns {
    /// Unique subject identifier
    pub subject_id: String,
    /// Lower window bound (inclusive)
    pub date_of_birth: String,
    /// Upper window bound (inclusive)
    pub study_start_date: String,
}

/// Materialization target for the covariate table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Target table name
    pub table: String,

    /// Target schema (default: the project schema)
    #[serde(default)]
    pub schema: Option<String>,

    /// Replace an existing target table
    #[serde(default)]
    pub overwrite: bool,

    /// Create the target as a temporary table
    #[serde(default)]
    pub temporary: bool,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_warehouse_path() -> String {
    ":memory:".to_string()
}

impl Config {
    /// Load and validate a configuration file
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-field validation
    pub fn validate(&self) -> CoreResult<()> {
        let mut codelist_names = HashSet::new();
        for codelist in &self.codelists {
            if !codelist_names.insert(codelist.name.as_str()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("duplicate codelist name '{}'", codelist.name),
                });
            }
        }

        let mut source_names = HashSet::new();
        for source in &self.sources {
            if !source_names.insert(source.name.as_str()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("duplicate source name '{}'", source.name),
                });
            }
            if source.priority == 0 {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "source '{}': priority must be a positive integer",
                        source.name
                    ),
                });
            }
            if !codelist_names.contains(source.codelist.as_str()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "source '{}' references unknown codelist '{}'",
                        source.name, source.codelist
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
