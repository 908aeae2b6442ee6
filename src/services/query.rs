//! Entry filtering and pagination
//!
//! Filters are applied in a fixed order (crop, stage, date range, text
//! search), the survivors are sorted newest first, and the result is cut
//! into 1-based pages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::settings::PaginationSettings;
use crate::error::{JournalError, JournalResult};
use crate::models::DiaryEntry;

/// Criteria for listing entries; unset or blank fields match everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryFilter {
    /// Exact crop name, case-insensitive
    pub crop_type: Option<String>,
    /// Exact growth stage, case-insensitive
    pub growth_stage: Option<String>,
    /// Inclusive lower bound on the entry date
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the entry date
    pub date_to: Option<NaiveDate>,
    /// Substring of observations, notes, or crop name, case-insensitive
    pub search: Option<String>,
}

impl EntryFilter {
    /// Reject a date range that can never match
    pub fn check(&self) -> JournalResult<()> {
        match (self.date_from, self.date_to) {
            (Some(from), Some(to)) if from > to => Err(JournalError::Validation(format!(
                "date_from {} is after date_to {}",
                from, to
            ))),
            _ => Ok(()),
        }
    }

    /// Filter `entries` and sort the matches newest first
    pub fn apply<'e, I>(&self, entries: I) -> Vec<&'e DiaryEntry>
    where
        I: IntoIterator<Item = &'e DiaryEntry>,
    {
        let crop = active(&self.crop_type).map(str::to_lowercase);
        let stage = active(&self.growth_stage).map(str::to_lowercase);
        let search = active(&self.search).map(str::to_lowercase);

        let mut matched: Vec<&DiaryEntry> = entries
            .into_iter()
            .filter(|e| crop.as_ref().map_or(true, |c| e.crop_type.to_lowercase() == *c))
            .filter(|e| {
                stage
                    .as_ref()
                    .map_or(true, |s| e.growth_stage.to_lowercase() == *s)
            })
            .filter(|e| self.date_from.map_or(true, |from| e.date >= from))
            .filter(|e| self.date_to.map_or(true, |to| e.date <= to))
            .filter(|e| search.as_ref().map_or(true, |s| e.matches_search(s)))
            .collect();

        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matched
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Which slice of the listing to return
///
/// Page addressing takes precedence. When only `offset`/`limit` are given
/// they are translated to the page holding `offset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl PageRequest {
    pub fn page(page: usize, per_page: usize) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            ..Self::default()
        }
    }

    pub fn offset(offset: usize, limit: usize) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Resolve to a 1-based page number and a clamped page size
    pub fn resolve(&self, settings: &PaginationSettings) -> (usize, usize) {
        let max = settings.max_per_page.max(1);
        let clamp = |size: usize| size.clamp(1, max);

        if self.page.is_none() && (self.offset.is_some() || self.limit.is_some()) {
            let per_page = clamp(self.limit.unwrap_or(settings.default_per_page));
            let page = (self.offset.unwrap_or(0) / per_page).saturating_add(1);
            return (page, per_page);
        }

        let per_page = clamp(self.per_page.unwrap_or(settings.default_per_page));
        (self.page.unwrap_or(1).max(1), per_page)
    }
}

/// Position of a page within the full result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub per_page: usize,
    /// Entries matching the filter, across all pages
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
    pub next_page: Option<usize>,
    pub prev_page: Option<usize>,
    /// 1-based index of the first entry on this page; 0 when empty
    pub start_index: usize,
    /// 1-based index of the last entry on this page; 0 when empty
    pub end_index: usize,
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub entries: Vec<T>,
    pub pagination: PageInfo,
    pub returned_entries: usize,
}

/// Cut `items` into pages and return page `page`
///
/// Page 0 is treated as page 1. Asking past the last page is an error unless
/// there are no items at all, in which case an empty first page is returned.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> JournalResult<Page<T>> {
    let per_page = per_page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let page = match page.max(1) {
        _ if total == 0 => 1,
        page if page > total_pages => {
            return Err(JournalError::PageOutOfRange { page, total_pages })
        }
        page => page,
    };

    // page <= total_pages here, so the start lies inside the result
    let start = (page - 1).saturating_mul(per_page);
    let entries: Vec<T> = items.into_iter().skip(start).take(per_page).collect();
    let returned = entries.len();

    let has_next = page < total_pages;
    let has_prev = page > 1 && total > 0;

    Ok(Page {
        pagination: PageInfo {
            page,
            per_page,
            total,
            total_pages,
            has_next,
            has_prev,
            next_page: has_next.then_some(page + 1),
            prev_page: has_prev.then_some(page - 1),
            start_index: if returned == 0 { 0 } else { start + 1 },
            end_index: if returned == 0 { 0 } else { start + returned },
        },
        returned_entries: returned,
        entries,
    })
}
