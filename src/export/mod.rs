//! Export module for Crop Journal
//!
//! Provides diary export in three encodings:
//! - JSON: the native document form, readable back with `read_native`
//! - CSV: one row per entry with a fixed column order (spreadsheet-compatible)
//! - YAML: the native form for human reading

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::str::FromStr;

use crate::error::JournalError;

pub use self::csv::{export_entries_csv, CSV_HEADERS};
pub use json::{export_native_json, read_native};
pub use yaml::export_yaml;

/// Supported export encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Yaml,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => Err(JournalError::Validation(format!(
                "Unknown export format '{}' (expected json, csv, or yaml)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("yml".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
    }
}
