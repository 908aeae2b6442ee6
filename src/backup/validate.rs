//! Structural validation of persisted diary documents
//!
//! Works on untyped JSON so that a damaged file can be described field by
//! field instead of failing on the first serde error.

use std::path::Path;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use serde_json::Value;

use crate::storage::file_io::read_json_value;
use crate::validation::DATE_FORMAT;

/// Entry fields that must be present as non-empty strings
const REQUIRED_ENTRY_FIELDS: [&str; 5] = ["id", "timestamp", "date", "crop_type", "observations"];

/// Outcome of validating a document file
#[derive(Debug, Clone, Serialize)]
pub struct DocumentValidation {
    pub valid: bool,
    /// Number of entries, when `entries` is a list
    pub entry_count: Option<usize>,
    /// Problems that make the document unusable
    pub issues: Vec<String>,
    /// Inconsistencies that do not block loading
    pub warnings: Vec<String>,
}

impl DocumentValidation {
    fn from_parts(entry_count: Option<usize>, issues: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: issues.is_empty(),
            entry_count,
            issues,
            warnings,
        }
    }

    /// Get a one-line summary
    pub fn summary(&self) -> String {
        if self.valid {
            format!(
                "Valid document ({} entries{})",
                self.entry_count.unwrap_or(0),
                if self.warnings.is_empty() {
                    String::new()
                } else {
                    format!(", {} warning(s)", self.warnings.len())
                }
            )
        } else {
            format!("Invalid document: {}", self.issues.join("; "))
        }
    }
}

/// Validate a diary document on disk
pub fn validate_document_file(path: &Path) -> DocumentValidation {
    if !path.exists() {
        return DocumentValidation::from_parts(
            None,
            vec![format!("{} does not exist", path.display())],
            Vec::new(),
        );
    }

    match read_json_value(path) {
        Ok(value) => validate_document_value(&value),
        Err(e) => DocumentValidation::from_parts(None, vec![e.to_string()], Vec::new()),
    }
}

/// Validate the shape of an already-parsed diary document
pub fn validate_document_value(value: &Value) -> DocumentValidation {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    let Some(root) = value.as_object() else {
        return DocumentValidation::from_parts(
            None,
            vec!["document is not a JSON object".into()],
            warnings,
        );
    };

    let entries = match root.get("entries") {
        Some(Value::Array(entries)) => Some(entries),
        Some(_) => {
            issues.push("'entries' is not a list".into());
            None
        }
        None => {
            issues.push("'entries' is missing".into());
            None
        }
    };

    match root.get("metadata") {
        None | Some(Value::Object(_)) => {}
        Some(_) => issues.push("'metadata' is not an object".into()),
    }

    if let Some(entries) = entries {
        for (index, entry) in entries.iter().enumerate() {
            validate_entry_value(index, entry, &mut issues);
        }

        if let Some(total) = root
            .get("metadata")
            .and_then(|m| m.get("total_entries"))
            .and_then(Value::as_u64)
        {
            if total as usize != entries.len() {
                warnings.push(format!(
                    "metadata.total_entries is {} but there are {} entries",
                    total,
                    entries.len()
                ));
            }
        }
    }

    DocumentValidation::from_parts(entries.map(Vec::len), issues, warnings)
}

fn validate_entry_value(index: usize, entry: &Value, issues: &mut Vec<String>) {
    let Some(obj) = entry.as_object() else {
        issues.push(format!("entry {} is not an object", index));
        return;
    };

    for field in REQUIRED_ENTRY_FIELDS {
        match obj.get(field).and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => {}
            _ => issues.push(format!(
                "entry {} field '{}' is missing or empty",
                index, field
            )),
        }
    }

    if let Some(ts) = obj.get("timestamp").and_then(Value::as_str) {
        if !ts.trim().is_empty() && DateTime::parse_from_rfc3339(ts).is_err() {
            issues.push(format!("entry {} has malformed timestamp '{}'", index, ts));
        }
    }

    if let Some(date) = obj.get("date").and_then(Value::as_str) {
        if !date.trim().is_empty() && NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
            issues.push(format!("entry {} has malformed date '{}'", index, date));
        }
    }
}
