//! Codelist loading and validation.
//!
//! A codelist is a CSV file with one row per (code, phenotype) pair. Each
//! codelist may have an optional 1:1 sidecar configuration file with the
//! same name (e.g. `icd10.csv` + `icd10.yml`) declaring column types and
//! per-coding-system code normalization. Every cell is converted to its
//! declared type before anything reaches the warehouse; validation failures
//! are typed errors naming the offending column and file.

use crate::column_type::{CellValue, ColumnType};
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Column name holding clinical codes
pub const CODE_COLUMN: &str = "code";
/// Column name holding phenotype labels
pub const PHENOTYPE_COLUMN: &str = "phenotype";

/// Sidecar configuration for a codelist CSV.
///
/// Follows the 1:1 naming convention: the config file has the same stem as
/// its CSV file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodelistSpec {
    /// Config format version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Codelist description
    #[serde(default)]
    pub description: Option<String>,

    /// Declared column types, column name to type string.
    /// Empty means the default `code`/`phenotype` character pair.
    #[serde(default)]
    pub column_types: BTreeMap<String, String>,

    /// Fixed-width truncation applied to codes before matching
    #[serde(default)]
    pub code_width: Option<usize>,

    /// CSV delimiter (default: comma)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_version() -> u32 {
    1
}

fn default_delimiter() -> char {
    ','
}

impl Default for CodelistSpec {
    fn default() -> Self {
        Self {
            version: default_version(),
            description: None,
            column_types: BTreeMap::new(),
            code_width: None,
            delimiter: default_delimiter(),
        }
    }
}

impl CodelistSpec {
    /// Load a sidecar configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let spec: CodelistSpec = serde_yaml::from_str(&content)?;
        Ok(spec)
    }
}

/// One clinical code mapped to a phenotype label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodelistEntry {
    /// Normalized clinical code
    pub code: String,
    /// Phenotype label
    pub phenotype: String,
}

/// A loaded, validated codelist
#[derive(Debug, Clone)]
pub struct Codelist {
    /// Codelist name (from the project config)
    pub name: String,
    /// Source file, for messages
    pub file: String,
    /// Columns in CSV header order with their declared types
    pub columns: Vec<(String, ColumnType)>,
    /// Converted rows, parallel to `columns`
    pub rows: Vec<Vec<CellValue>>,
    entries: Vec<CodelistEntry>,
}

impl Codelist {
    /// Load a codelist, picking up a 1:1 sidecar config when present
    pub fn load(name: &str, path: &Path) -> CoreResult<Self> {
        let yml_path = path.with_extension("yml");
        let yaml_path = path.with_extension("yaml");

        let spec = if yml_path.exists() {
            CodelistSpec::load(&yml_path)?
        } else if yaml_path.exists() {
            CodelistSpec::load(&yaml_path)?
        } else {
            CodelistSpec::default()
        };

        Self::load_with_spec(name, path, &spec)
    }

    /// Load a codelist with an explicit configuration
    pub fn load_with_spec(name: &str, path: &Path, spec: &CodelistSpec) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::CodelistNotFound {
                path: path.display().to_string(),
            });
        }
        let file = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: file.clone(),
            source: e,
        })?;

        let mut lines = content.lines().enumerate();
        let header = loop {
            match lines.next() {
                Some((_, line)) if line.trim().is_empty() => continue,
                Some((_, line)) => break split_record(line, spec.delimiter),
                None => {
                    return Err(CoreError::SchemaMismatch {
                        file,
                        missing: declared_columns(spec).join(", "),
                        unexpected: String::new(),
                    })
                }
            }
        };

        let columns = validate_header(&header, spec, &file)?;
        let code_idx = header.iter().position(|c| c == CODE_COLUMN);
        let phenotype_idx = header.iter().position(|c| c == PHENOTYPE_COLUMN);
        let (code_idx, phenotype_idx) = match (code_idx, phenotype_idx) {
            (Some(c), Some(p)) => (c, p),
            _ => {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "codelist '{}' must declare both '{}' and '{}' columns",
                        file, CODE_COLUMN, PHENOTYPE_COLUMN
                    ),
                })
            }
        };

        let mut rows = Vec::new();
        let mut entries = Vec::new();
        for (idx, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let raw = split_record(line, spec.delimiter);
            if raw.len() != columns.len() {
                return Err(CoreError::RowShape {
                    file,
                    line: idx + 1,
                    expected: columns.len(),
                    found: raw.len(),
                });
            }

            let mut row = Vec::with_capacity(columns.len());
            for (cell, (col_name, col_type)) in raw.iter().zip(&columns) {
                let cell = if col_name == CODE_COLUMN {
                    normalize_code(cell, spec.code_width)
                } else {
                    cell.clone()
                };
                row.push(col_type.convert(&cell, col_name, &file)?);
            }

            match (row[code_idx].as_str(), row[phenotype_idx].as_str()) {
                (Some(code), Some(phenotype)) => entries.push(CodelistEntry {
                    code: code.to_string(),
                    phenotype: phenotype.to_string(),
                }),
                _ => {
                    log::warn!(
                        "Skipping row {} of {}: empty code or phenotype",
                        idx + 1,
                        file
                    );
                    continue;
                }
            }
            rows.push(row);
        }

        Ok(Self {
            name: name.to_string(),
            file,
            columns,
            rows,
            entries,
        })
    }

    /// Validated (code, phenotype) entries
    pub fn entries(&self) -> &[CodelistEntry] {
        &self.entries
    }

    /// Sorted, deduplicated phenotype labels in this codelist
    pub fn phenotypes(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.entries.iter().map(|e| e.phenotype.clone()).collect();
        labels.sort();
        labels.dedup();
        labels
    }

    /// Number of accepted entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entry was accepted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Columns declared by the sidecar, or the default code/phenotype pair
fn declared_columns(spec: &CodelistSpec) -> Vec<String> {
    if spec.column_types.is_empty() {
        vec![CODE_COLUMN.to_string(), PHENOTYPE_COLUMN.to_string()]
    } else {
        spec.column_types.keys().cloned().collect()
    }
}

/// Check the CSV header against the declared column set and resolve types
fn validate_header(
    header: &[String],
    spec: &CodelistSpec,
    file: &str,
) -> CoreResult<Vec<(String, ColumnType)>> {
    let declared = declared_columns(spec);

    let missing: Vec<&str> = declared
        .iter()
        .filter(|column| !header.iter().any(|h| h == *column))
        .map(String::as_str)
        .collect();
    let unexpected: Vec<&str> = header
        .iter()
        .filter(|column| !declared.iter().any(|d| d == *column))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(CoreError::SchemaMismatch {
            file: file.to_string(),
            missing: missing.join(", "),
            unexpected: unexpected.join(", "),
        });
    }

    header
        .iter()
        .map(|name| {
            let declared_type = spec
                .column_types
                .get(name)
                .map(String::as_str)
                .unwrap_or("character");
            Ok((name.clone(), ColumnType::parse(declared_type, name, file)?))
        })
        .collect()
}

/// Truncate a code to the configured width, counting characters
fn normalize_code(code: &str, width: Option<usize>) -> String {
    match width {
        Some(w) => code.chars().take(w).collect(),
        None => code.to_string(),
    }
}

/// Split one CSV record. Fields may be double-quoted; `""` inside a quoted
/// field is a literal quote. Records never span lines.
fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
#[path = "codelist_test.rs"]
mod tests;
