//! Declared column types and their conversion rules.
//!
//! Codelist files declare a type for every column; values are converted
//! before anything is staged into the warehouse. The set of types is closed:
//! a declaration outside it is an error at load time, not a fallback to
//! string.

use crate::error::{CoreError, CoreResult};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Closed set of declarable column types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Free-form text
    Character,
    /// Double-precision floating point
    Numeric,
    /// 32-bit integer
    Integer,
    /// 64-bit integer
    BigInt,
    /// Boolean
    Boolean,
    /// Calendar date (`%Y-%m-%d`)
    Date,
    /// Date and time (`%Y-%m-%dT%H:%M:%S` or `%Y-%m-%d %H:%M:%S`)
    DateTime,
}

impl ColumnType {
    /// Parse a declared type string (case-insensitive).
    ///
    /// Unknown declarations surface the offending column and file.
    pub fn parse(declared: &str, column: &str, file: &str) -> CoreResult<Self> {
        match declared.to_ascii_lowercase().as_str() {
            "character" | "varchar" | "text" => Ok(ColumnType::Character),
            "numeric" | "double" => Ok(ColumnType::Numeric),
            "integer" | "int" => Ok(ColumnType::Integer),
            "bigint" | "int64" => Ok(ColumnType::BigInt),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "date" => Ok(ColumnType::Date),
            "datetime" | "timestamp" => Ok(ColumnType::DateTime),
            _ => Err(CoreError::UnknownColumnType {
                file: file.to_string(),
                column: column.to_string(),
                declared: declared.to_string(),
            }),
        }
    }

    /// Warehouse DDL type name for staging
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Character => "VARCHAR",
            ColumnType::Numeric => "DOUBLE",
            ColumnType::Integer => "INTEGER",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Date => "DATE",
            ColumnType::DateTime => "TIMESTAMP",
        }
    }

    /// Convert one raw cell to a typed value.
    ///
    /// An empty cell converts to `CellValue::Null` for every type.
    pub fn convert(self, raw: &str, column: &str, file: &str) -> CoreResult<CellValue> {
        if raw.is_empty() {
            return Ok(CellValue::Null);
        }
        let fail = |message: String| CoreError::TypeConversion {
            file: file.to_string(),
            column: column.to_string(),
            value: raw.to_string(),
            target: self.sql_type().to_string(),
            message,
        };
        match self {
            ColumnType::Character => Ok(CellValue::Character(raw.to_string())),
            ColumnType::Numeric => raw
                .parse::<f64>()
                .map(CellValue::Numeric)
                .map_err(|e| fail(e.to_string())),
            ColumnType::Integer => raw
                .parse::<i32>()
                .map(CellValue::Integer)
                .map_err(|e| fail(e.to_string())),
            ColumnType::BigInt => raw
                .parse::<i64>()
                .map(CellValue::BigInt)
                .map_err(|e| fail(e.to_string())),
            ColumnType::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Ok(CellValue::Boolean(true)),
                "false" | "f" | "0" => Ok(CellValue::Boolean(false)),
                _ => Err(fail("expected true/false".to_string())),
            },
            ColumnType::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(CellValue::Date)
                .map_err(|e| fail(e.to_string())),
            ColumnType::DateTime => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
                .map(CellValue::DateTime)
                .map_err(|e| fail(e.to_string())),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql_type())
    }
}

/// A converted cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Absent value
    Null,
    /// Text value
    Character(String),
    /// Floating point value
    Numeric(f64),
    /// 32-bit integer value
    Integer(i32),
    /// 64-bit integer value
    BigInt(i64),
    /// Boolean value
    Boolean(bool),
    /// Date value
    Date(NaiveDate),
    /// Timestamp value
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Render this value as a SQL literal (single quotes doubled in text)
    pub fn sql_literal(&self) -> String {
        match self {
            CellValue::Null => "NULL".to_string(),
            CellValue::Character(s) => format!("'{}'", s.replace('\'', "''")),
            CellValue::Numeric(n) => n.to_string(),
            CellValue::Integer(n) => n.to_string(),
            CellValue::BigInt(n) => n.to_string(),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Date(d) => format!("DATE '{}'", d.format("%Y-%m-%d")),
            CellValue::DateTime(t) => format!("TIMESTAMP '{}'", t.format("%Y-%m-%d %H:%M:%S")),
        }
    }

    /// Text content for character cells
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Character(s) => Some(s),
            _ => None,
        }
    }
}
