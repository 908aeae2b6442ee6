//! Entry display formatting
//!
//! Formats diary entries for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{DiaryEntry, EntrySummary};
use crate::services::Page;

use super::report::truncate;

const OBSERVATION_COLUMN_WIDTH: usize = 48;

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Crop")]
    crop: String,
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Observations")]
    observations: String,
}

impl From<&DiaryEntry> for EntryRow {
    fn from(entry: &DiaryEntry) -> Self {
        Self {
            id: entry.id.short().to_string(),
            date: entry.date.to_string(),
            crop: format!("{} {}", entry.crop_category.icon, entry.crop_type),
            stage: entry.growth_stage.clone(),
            observations: truncate(
                &entry.observations.replace('\n', " "),
                OBSERVATION_COLUMN_WIDTH,
            ),
        }
    }
}

/// Format one page of entries as a table with a position footer
pub fn format_entry_page(page: &Page<DiaryEntry>) -> String {
    if page.entries.is_empty() {
        return "No entries found.".to_string();
    }

    let rows: Vec<EntryRow> = page.entries.iter().map(EntryRow::from).collect();
    let mut output = Table::new(rows).with(Style::psql()).to_string();

    let info = &page.pagination;
    output.push_str(&format!(
        "\n\nShowing {}-{} of {} (page {} of {})",
        info.start_index, info.end_index, info.total, info.page, info.total_pages
    ));
    if let Some(next) = info.next_page {
        output.push_str(&format!(" - next: --page {}", next));
    }

    output
}

/// Format a single entry's details
pub fn format_entry_details(entry: &DiaryEntry) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {} ({})\n",
        entry.crop_category.icon, entry.crop_type, entry.crop_category.name
    ));
    output.push_str(&format!("  ID:           {}\n", entry.id));
    output.push_str(&format!("  Date:         {}\n", entry.date));
    if !entry.growth_stage.is_empty() {
        output.push_str(&format!(
            "  Stage:        {} {}\n",
            entry.growth_stage_info.icon, entry.growth_stage
        ));
    }
    output.push_str(&format!(
        "  Recorded:     {}\n",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(modified) = entry.last_modified {
        output.push_str(&format!(
            "  Modified:     {}\n",
            modified.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    if let Some(weather) = &entry.weather {
        output.push_str(&format!("  Weather:      {}\n", weather));
    }
    if let Some(location) = &entry.location {
        output.push_str(&format!("  Location:     {}\n", location));
    }

    output.push_str("\nObservations:\n");
    for line in entry.observations.lines() {
        output.push_str(&format!("  {}\n", line));
    }

    if !entry.actions_taken.is_empty() {
        output.push_str("\nActions taken:\n");
        for action in &entry.actions_taken {
            output.push_str(&format!("  - {}\n", action));
        }
    }

    if let Some(notes) = &entry.user_notes {
        output.push_str(&format!("\nNotes: {}\n", notes));
    }

    if !entry.photos.is_empty() {
        output.push_str(&format!("\nPhotos ({}):\n", entry.photos.len()));
        for photo in &entry.photos {
            output.push_str(&format!("  {}\n", photo));
        }
    }

    output
}

/// One-line summary, as shown after a delete
pub fn format_entry_summary(summary: &EntrySummary) -> String {
    let stage = if summary.growth_stage.is_empty() {
        String::new()
    } else {
        format!(" [{}]", summary.growth_stage)
    };
    format!(
        "{} {} {}{}: {}",
        summary.id.short(),
        summary.date,
        summary.crop_type,
        stage,
        summary.observations
    )
}
