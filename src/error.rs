//! Custom error types for Crop Journal
//!
//! This module defines the error hierarchy for the journal using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// The main error type for Crop Journal operations
#[derive(Error, Debug)]
pub enum JournalError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// A request argument that is not an entry field is malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// One or more entry fields failed validation
    #[error("Invalid entry: {0}")]
    InvalidEntry(ValidationErrors),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Requested page lies past the last page of a non-empty result
    #[error("Page {page} is out of range (total pages: {total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },

    /// The persisted document does not parse or has the wrong shape
    #[error("Storage corruption: {0}")]
    Corruption(String),

    /// Filesystem errors while reading or writing persisted data
    #[error("Storage error: {0}")]
    Storage(String),

    /// No usable backup, or the backup itself is corrupt
    #[error("Recovery failed: {0}")]
    Recovery(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Model response could not be interpreted
    #[error("Advisor error: {0}")]
    Advisor(String),
}

impl JournalError {
    /// Create a "not found" error for diary entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidEntry(_))
    }

    /// Field violations, when this error came from the entry validator
    pub fn violations(&self) -> Option<&ValidationErrors> {
        match self {
            Self::InvalidEntry(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<std::io::Error> for JournalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<ValidationErrors> for JournalError {
    fn from(errors: ValidationErrors) -> Self {
        Self::InvalidEntry(errors)
    }
}

/// Result type alias for Crop Journal operations
pub type JournalResult<T> = Result<T, JournalError>;
