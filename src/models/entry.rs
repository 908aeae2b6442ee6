//! Diary entry model
//!
//! A diary entry records one observation of a crop. Entries are created from
//! a set of user-supplied fields, replaced wholesale on update, and carry
//! frozen copies of the category and growth stage labels that applied when
//! they were written.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{CropCatalog, CropCategory, GrowthStageInfo};
use super::ids::EntryId;

/// Length of the observations excerpt in entry summaries
pub const SUMMARY_OBSERVATIONS_LEN: usize = 100;

/// User-supplied fields for creating or replacing an entry
///
/// Every field defaults so that a request missing `crop_type` or
/// `observations` still deserializes and is reported by the validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryFields {
    /// Calendar date in `YYYY-MM-DD`; blank means today
    pub date: Option<String>,
    pub crop_type: String,
    pub growth_stage: String,
    pub observations: String,
    pub weather: Option<String>,
    pub location: Option<String>,
    pub user_notes: Option<String>,
    pub actions_taken: Vec<String>,
    pub photos: Vec<String>,
}

impl EntryFields {
    /// Create fields with the two required values set
    pub fn new(crop_type: impl Into<String>, observations: impl Into<String>) -> Self {
        Self {
            crop_type: crop_type.into(),
            observations: observations.into(),
            ..Default::default()
        }
    }
}

/// A single diary observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    /// Unique identifier, assigned at creation
    pub id: EntryId,

    /// Creation instant
    pub timestamp: DateTime<Utc>,

    /// Instant of the most recent update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// Date the observation refers to
    pub date: NaiveDate,

    pub crop_type: String,

    #[serde(default)]
    pub crop_category: CropCategory,

    #[serde(default)]
    pub growth_stage: String,

    #[serde(default)]
    pub growth_stage_info: GrowthStageInfo,

    pub observations: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,

    #[serde(default)]
    pub actions_taken: Vec<String>,

    #[serde(default)]
    pub photos: Vec<String>,
}

impl DiaryEntry {
    /// Build a new entry from validated fields
    pub fn create(
        fields: EntryFields,
        date: NaiveDate,
        catalog: &CropCatalog,
        now: DateTime<Utc>,
    ) -> Self {
        let crop_type = fields.crop_type.trim().to_string();
        let growth_stage = fields.growth_stage.trim().to_string();

        Self {
            id: EntryId::new(),
            timestamp: now,
            last_modified: None,
            date,
            crop_category: catalog.resolve_category(&crop_type),
            growth_stage_info: catalog.resolve_stage(&growth_stage),
            crop_type,
            growth_stage,
            observations: fields.observations.trim().to_string(),
            weather: non_blank(fields.weather),
            location: non_blank(fields.location),
            user_notes: non_blank(fields.user_notes),
            actions_taken: trimmed_items(fields.actions_taken),
            photos: trimmed_items(fields.photos),
        }
    }

    /// Replace every user field, keeping the id and creation timestamp
    ///
    /// `last_modified` never precedes `timestamp`, even if the clock moved
    /// backwards since creation.
    pub fn replace_with(
        &self,
        fields: EntryFields,
        date: NaiveDate,
        catalog: &CropCatalog,
        now: DateTime<Utc>,
    ) -> Self {
        let mut replaced = Self::create(fields, date, catalog, now);
        replaced.id = self.id.clone();
        replaced.timestamp = self.timestamp;
        replaced.last_modified = Some(now.max(self.timestamp));
        replaced
    }

    /// The entry's fields in request form
    pub fn to_fields(&self) -> EntryFields {
        EntryFields {
            date: Some(self.date.format("%Y-%m-%d").to_string()),
            crop_type: self.crop_type.clone(),
            growth_stage: self.growth_stage.clone(),
            observations: self.observations.clone(),
            weather: self.weather.clone(),
            location: self.location.clone(),
            user_notes: self.user_notes.clone(),
            actions_taken: self.actions_taken.clone(),
            photos: self.photos.clone(),
        }
    }

    /// Check whether a case-insensitive search term appears in the text fields
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        self.observations.to_lowercase().contains(needle_lower)
            || self.crop_type.to_lowercase().contains(needle_lower)
            || self
                .user_notes
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(needle_lower))
    }

    /// Compact view of the entry for responses and listings
    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            id: self.id.clone(),
            date: self.date,
            crop_type: self.crop_type.clone(),
            growth_stage: self.growth_stage.clone(),
            observations: truncate_chars(&self.observations, SUMMARY_OBSERVATIONS_LEN),
        }
    }
}

/// Abbreviated entry, with observations cut to a short excerpt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: EntryId,
    pub date: NaiveDate,
    pub crop_type: String,
    pub growth_stage: String,
    pub observations: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn trimmed_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect()
}

/// Truncate to `max` characters, marking the cut with "..."
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
