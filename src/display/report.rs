//! Report formatting for terminal output
//!
//! Statistics, backup listings, validation results, and integrity reports.

use chrono::{DateTime, Utc};

use crate::backup::{BackupInfo, DocumentValidation, IntegrityReport};
use crate::services::Statistics;
use crate::validation::ValidationErrors;

const BAR_WIDTH: usize = 20;

/// Format diary statistics with per-crop and per-stage bars
pub fn format_stats(stats: &Statistics) -> String {
    let mut output = String::new();

    output.push_str("Diary Statistics\n");
    output.push_str(&format!("{}\n", separator(40)));
    output.push_str(&format!("Total entries:   {}\n", stats.total_entries));
    output.push_str(&format!(
        "Last {} days:    {}\n",
        stats.recent_days, stats.recent_entries
    ));
    if let (Some(first), Some(last)) = (stats.earliest_date, stats.latest_date) {
        output.push_str(&format!("Date range:      {} to {}\n", first, last));
    }
    if let Some((crop, count)) = stats.top_crop() {
        output.push_str(&format!("Most recorded:   {} ({})\n", crop, count));
    }

    for (title, counts) in [("By crop", &stats.by_crop), ("By stage", &stats.by_stage)] {
        if counts.is_empty() {
            continue;
        }
        output.push_str(&format!("\n{}\n", title));

        let max = counts.values().copied().max().unwrap_or(0);
        let width = counts.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        let mut rows: Vec<_> = counts.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (key, count) in rows {
            output.push_str(&format!(
                "  {:<width$}  {}  {}\n",
                key,
                format_bar(*count, max, BAR_WIDTH),
                count,
                width = width
            ));
        }
    }

    output
}

/// Format timestamped backups, newest first
pub fn format_backup_list(backups: &[BackupInfo], verbose: bool) -> String {
    if backups.is_empty() {
        return "No backups found.".to_string();
    }

    let now = Utc::now();
    let mut output = String::new();
    for (i, backup) in backups.iter().enumerate() {
        let age = format_duration(now.signed_duration_since(backup.modified));
        if verbose {
            output.push_str(&format!(
                "{}. {}\n   Timestamp: {}\n   Size: {}\n   Age: {}\n   Path: {}\n",
                i + 1,
                backup.filename,
                backup.timestamp,
                format_size(backup.size_bytes),
                age,
                backup.path.display()
            ));
        } else {
            output.push_str(&format!(
                "  {}. {} ({} ago, {})\n",
                i + 1,
                backup.timestamp,
                age,
                format_size(backup.size_bytes)
            ));
        }
    }
    output.push_str(&format!("\nTotal: {} backup(s)", backups.len()));
    output
}

/// Format a document validation result
pub fn format_validation(validation: &DocumentValidation) -> String {
    let mut output = validation.summary();
    for issue in &validation.issues {
        output.push_str(&format!("\n  ✗ {}", issue));
    }
    for warning in &validation.warnings {
        output.push_str(&format!("\n  ! {}", warning));
    }
    output
}

/// Format entry validation failures, one per line
pub fn format_violations(errors: &ValidationErrors) -> String {
    let mut output = format!("Entry rejected ({} problem(s)):", errors.len());
    for violation in errors.violations() {
        output.push_str(&format!("\n  - {}", violation));
    }
    output
}

/// Format an integrity report
pub fn format_integrity_report(report: &IntegrityReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Integrity check at {}: {}\n",
        report.checked_at.format("%Y-%m-%d %H:%M:%S UTC"),
        if report.is_healthy() {
            "HEALTHY"
        } else {
            "ISSUES FOUND"
        }
    ));
    output.push_str(&format!("{}\n", separator(60)));

    for file in &report.files {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.path.display().to_string());

        if !file.exists {
            output.push_str(&format!("{}: missing\n", name));
            continue;
        }

        output.push_str(&format!(
            "{}: {}, {}, backup {}\n",
            name,
            if file.valid { "valid" } else { "INVALID" },
            file.size_bytes.map(format_size).unwrap_or_else(|| "?".into()),
            if file.has_backup { "present" } else { "absent" }
        ));
        if let Some(modified) = file.modified {
            output.push_str(&format!("  modified {}\n", format_timestamp(modified)));
        }
    }

    if !report.issues.is_empty() {
        output.push_str("\nIssues:\n");
        for issue in &report.issues {
            output.push_str(&format!("  - {}\n", issue));
        }
    }

    output
}

/// Truncate to `max_chars` characters with an ellipsis
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        "...".chars().take(max_chars).collect()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

fn format_bar(value: usize, max_value: usize, width: usize) -> String {
    if max_value == 0 || value == 0 {
        return " ".repeat(width);
    }
    let filled = ((value as f64 / max_value as f64) * width as f64).round() as usize;
    let filled = filled.clamp(1, width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }
    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }
    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
