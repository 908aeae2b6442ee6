//! Diary document model
//!
//! The whole diary is persisted as a single JSON document holding the entry
//! list and a small metadata block.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entry::DiaryEntry;
use super::ids::EntryId;

/// Current document format version
pub const DOCUMENT_VERSION: &str = "1.0";

/// Bookkeeping stored next to the entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Always equal to the number of entries after a successful write
    pub total_entries: usize,

    pub last_updated: DateTime<Utc>,

    #[serde(default = "default_version")]
    pub version: String,

    /// Set on documents synthesized after an unrecoverable load failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            total_entries: 0,
            last_updated: Utc::now(),
            version: default_version(),
            error: None,
        }
    }
}

/// The persisted diary: entries in creation order plus metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiaryDocument {
    pub entries: Vec<DiaryEntry>,

    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl DiaryDocument {
    /// Create an empty document with fresh metadata
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create an empty document flagged with a load error
    pub fn with_error(message: impl Into<String>) -> Self {
        let mut doc = Self::empty();
        doc.metadata.error = Some(message.into());
        doc
    }

    /// Whether this document stands in for one that could not be loaded
    pub fn has_error(&self) -> bool {
        self.metadata.error.is_some()
    }

    /// Find an entry by ID
    pub fn find(&self, id: &EntryId) -> Option<&DiaryEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Index of an entry by ID
    pub fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    /// Sync counters and the update stamp with the entry list
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.metadata.total_entries = self.entries.len();
        self.metadata.last_updated = now;
        self.metadata.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CropCatalog, EntryFields};
    use chrono::{Duration, NaiveDate};

    fn entry_at(offset_secs: i64) -> DiaryEntry {
        DiaryEntry::create(
            EntryFields::new("Kale", "ok"),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            &CropCatalog::default(),
            Utc::now() + Duration::seconds(offset_secs),
        )
    }

    #[test]
    fn test_empty_document() {
        let doc = DiaryDocument::empty();
        assert!(doc.entries.is_empty());
        assert_eq!(doc.metadata.total_entries, 0);
        assert_eq!(doc.metadata.version, DOCUMENT_VERSION);
        assert!(!doc.has_error());
    }

    #[test]
    fn test_touch_syncs_total() {
        let mut doc = DiaryDocument::with_error("boom");
        doc.entries.push(entry_at(0));
        doc.entries.push(entry_at(1));
        doc.touch(Utc::now());

        assert_eq!(doc.metadata.total_entries, 2);
        assert!(!doc.has_error());
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let doc: DiaryDocument = serde_json::from_str(r#"{"entries": []}"#).unwrap();
        assert_eq!(doc.metadata.total_entries, 0);
    }
}
