//! Append-only JSONL audit log

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{JournalError, JournalResult};

use super::entry::AuditEntry;

/// Writes audit entries to the log file and reads them back
///
/// Each line of the file is one complete JSON object.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry and flush it
    pub fn log(&self, entry: &AuditEntry) -> JournalResult<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| JournalError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| JournalError::Io(format!("Failed to open audit log: {}", e)))?;

        writeln!(file, "{}", json)
            .and_then(|_| file.flush())
            .map_err(|e| JournalError::Io(format!("Failed to write audit entry: {}", e)))
    }

    /// Read every entry, oldest first
    ///
    /// A line that does not parse (for example one cut short by a crash) is
    /// skipped with a warning rather than hiding the rest of the log.
    pub fn read_all(&self) -> JournalResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| JournalError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                JournalError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<AuditEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(line = index + 1, error = %e, "skipping malformed audit line"),
            }
        }

        Ok(entries)
    }

    /// The most recent `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> JournalResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// Every entry recorded for one entity id, oldest first
    pub fn history_for(&self, entity_id: &str) -> JournalResult<Vec<AuditEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| e.entity_id == entity_id)
            .collect())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}
