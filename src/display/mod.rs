//! Display formatting for terminal output
//!
//! Provides utilities for formatting entries, statistics, and health
//! reports for terminal display.

pub mod entry;
pub mod report;

pub use entry::{format_entry_details, format_entry_page, format_entry_summary};
pub use report::{
    format_backup_list, format_integrity_report, format_stats, format_validation,
    format_violations,
};
