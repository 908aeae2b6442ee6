//! CSV export
//!
//! Flattens each entry to one row. Lists are joined with ", " and absent
//! optional fields become empty cells.

use std::io::Write;

use crate::error::{JournalError, JournalResult};
use crate::models::DiaryEntry;

/// Column order of the tabular export
pub const CSV_HEADERS: [&str; 10] = [
    "ID",
    "Timestamp",
    "Date",
    "Crop Type",
    "Growth Stage",
    "Observations",
    "Weather",
    "Location",
    "Actions Taken",
    "User Notes",
];

/// Write entries as CSV, in the order given
pub fn export_entries_csv<'e, W, I>(entries: I, writer: W) -> JournalResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'e DiaryEntry>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(CSV_HEADERS)
        .map_err(|e| JournalError::Export(e.to_string()))?;

    let mut rows = 0;
    for entry in entries {
        csv_writer
            .write_record(row(entry))
            .map_err(|e| JournalError::Export(e.to_string()))?;
        rows += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| JournalError::Export(e.to_string()))?;
    Ok(rows)
}

fn row(entry: &DiaryEntry) -> [String; 10] {
    [
        entry.id.to_string(),
        entry.timestamp.to_rfc3339(),
        entry.date.format("%Y-%m-%d").to_string(),
        entry.crop_type.clone(),
        entry.growth_stage.clone(),
        entry.observations.clone(),
        entry.weather.clone().unwrap_or_default(),
        entry.location.clone().unwrap_or_default(),
        entry.actions_taken.join(", "),
        entry.user_notes.clone().unwrap_or_default(),
    ]
}
