//! Audit records
//!
//! One JSON object per line in the audit log. Entry records keep full
//! before/after snapshots so a deleted entry can be reconstructed by hand.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// Document replaced from a backup
    Restore,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Restore => "RESTORE",
        })
    }
}

/// What an audited operation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// A single diary entry
    Entry,
    /// The whole diary document
    Document,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityType::Entry => "Entry",
            EntityType::Document => "Document",
        })
    }
}

/// A single audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Entry id, or the document path for restores
    pub entity_id: String,

    /// Crop name for entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Changed fields for updates, or the restore summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Record a newly created entity
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Create, entity_type, entity_id, entity_name)
        }
    }

    /// Record an edit with both versions
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::new(Operation::Update, entity_type, entity_id, entity_name)
        }
    }

    /// Record a removed entity
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Delete, entity_type, entity_id, entity_name)
        }
    }

    /// Record a document restored from a backup
    pub fn restore(document: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            diff_summary: Some(summary.into()),
            ..Self::new(Operation::Restore, EntityType::Document, document, None)
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let name = self
            .entity_name
            .as_deref()
            .map(|n| format!(" ({})", n))
            .unwrap_or_default();
        let mut output = format!(
            "[{}] {} {} {}{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id,
            name
        );

        match (self.operation, &self.diff_summary) {
            (Operation::Restore, Some(summary)) => output.push_str(&format!("\n  {}", summary)),
            (_, Some(diff)) => output.push_str(&format!("\n  Changes: {}", diff)),
            (_, None) => {}
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Delete.to_string(), "DELETE");
        assert_eq!(Operation::Restore.to_string(), "RESTORE");
    }

    #[test]
    fn test_create_entry() {
        let data = json!({"crop_type": "Tomato", "observations": "Fruit set"});
        let entry = AuditEntry::create(
            EntityType::Entry,
            "5f0c2b1e",
            Some("Tomato".to_string()),
            &data,
        );

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.entity_type, EntityType::Entry);
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(data));
    }

    #[test]
    fn test_update_and_delete_entries() {
        let before = json!({"observations": "Budding"});
        let after = json!({"observations": "Flowering"});

        let update = AuditEntry::update(
            EntityType::Entry,
            "5f0c2b1e",
            None,
            &before,
            &after,
            Some("observations changed".into()),
        );
        assert!(update.before.is_some() && update.after.is_some());

        let delete = AuditEntry::delete(EntityType::Entry, "5f0c2b1e", None, &after);
        assert!(delete.before.is_some());
        assert!(delete.after.is_none());
    }

    #[test]
    fn test_restore_entry_serializes_lowercase() {
        let entry = AuditEntry::restore("diary_entries.json", "Restored 3 entries");
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["operation"], "restore");
        assert_eq!(json["entity_type"], "document");
        assert!(json.get("before").is_none());
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::create(
            EntityType::Entry,
            "5f0c2b1e",
            Some("Basil".to_string()),
            &json!({}),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CREATE Entry 5f0c2b1e (Basil)"));
    }
}
