//! Entry identifier
//!
//! Entry ids are opaque strings. New ids are random UUIDs, but documents
//! written by older tooling may carry any non-empty string, so parsing never
//! rejects a value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique, immutable identifier of a diary entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for compact terminal output
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntryId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_creation() {
        let id = EntryId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_id_uniqueness() {
        let id1 = EntryId::new();
        let id2 = id1.clone();
        assert_eq!(id1, id2);

        let id3 = EntryId::new();
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_short_display() {
        let id = EntryId::from("550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(id.short(), "550e8400");
        assert_eq!(EntryId::from("abc").short(), "abc");
    }

    #[test]
    fn test_id_serialization() {
        let id = EntryId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let deserialized: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_legacy_ids_parse() {
        let id: EntryId = " 20240101_120000 ".parse().unwrap();
        assert_eq!(id.as_str(), "20240101_120000");
    }
}
