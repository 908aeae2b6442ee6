//! Diary statistics

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::DiaryEntry;

/// Key used for entries recorded without a growth stage
const UNSPECIFIED_STAGE: &str = "unspecified";

/// Aggregate counts over the whole diary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_entries: usize,
    /// Entries per crop, keyed by lowercased crop name
    pub by_crop: BTreeMap<String, usize>,
    /// Entries per growth stage, keyed by lowercased stage
    pub by_stage: BTreeMap<String, usize>,
    /// Entries dated within the last `recent_days` days, today included
    pub recent_entries: usize,
    pub recent_days: i64,
    pub earliest_date: Option<NaiveDate>,
    pub latest_date: Option<NaiveDate>,
}

impl Statistics {
    pub fn compute(entries: &[DiaryEntry], today: NaiveDate, recent_days: i64) -> Self {
        // Out-of-range windows count every entry as recent
        let cutoff = Duration::try_days(recent_days.max(0))
            .and_then(|window| today.checked_sub_signed(window))
            .unwrap_or(NaiveDate::MIN);

        let mut by_crop = BTreeMap::new();
        let mut by_stage = BTreeMap::new();
        for entry in entries {
            *by_crop.entry(entry.crop_type.to_lowercase()).or_insert(0) += 1;

            let stage = match entry.growth_stage.trim() {
                "" => UNSPECIFIED_STAGE.to_string(),
                stage => stage.to_lowercase(),
            };
            *by_stage.entry(stage).or_insert(0) += 1;
        }

        Self {
            total_entries: entries.len(),
            by_crop,
            by_stage,
            recent_entries: entries.iter().filter(|e| e.date >= cutoff).count(),
            recent_days,
            earliest_date: entries.iter().map(|e| e.date).min(),
            latest_date: entries.iter().map(|e| e.date).max(),
        }
    }

    /// The crop with the most entries, ties broken alphabetically
    pub fn top_crop(&self) -> Option<(&str, usize)> {
        self.by_crop
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(crop, count)| (crop.as_str(), *count))
    }
}
