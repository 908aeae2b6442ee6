//! Statistics and health CLI commands

use crate::display::{format_integrity_report, format_stats, format_validation};
use crate::error::JournalResult;
use crate::services::EntryService;
use crate::storage::Storage;

/// Show diary statistics
pub fn handle_stats_command(storage: &Storage, json: bool) -> JournalResult<()> {
    let stats = EntryService::new(storage).stats()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", format_stats(&stats));
    }
    Ok(())
}

/// Validate the diary file's structure; returns whether it is valid
pub fn handle_validate_command(storage: &Storage) -> bool {
    let validation = storage.validate();
    println!("{}", format_validation(&validation));
    validation.valid
}

/// Run the integrity report; returns whether everything is healthy
pub fn handle_check_command(storage: &Storage, json: bool) -> JournalResult<bool> {
    let report = storage.integrity_report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_integrity_report(&report));
    }
    Ok(report.is_healthy())
}

/// Print the most recent audit records
pub fn handle_log_command(storage: &Storage, limit: usize) -> JournalResult<()> {
    let records = storage.audit().read_recent(limit)?;
    if records.is_empty() {
        println!("No changes recorded yet.");
    }
    for record in records {
        println!("{}", record.format_human_readable());
    }
    Ok(())
}
