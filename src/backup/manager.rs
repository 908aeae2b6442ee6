//! Backup manager for Crop Journal
//!
//! Every write snapshots the current file twice: once to a fixed-name
//! `<file>.backup` and once to a timestamped `<file>.backup_<YYYYMMDD_HHMMSS>`.
//! Timestamped copies are pruned to the most recently modified N.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::settings::BackupRetention;
use crate::error::{JournalError, JournalResult};
use crate::storage::file_io::copy_atomic;

/// Second-resolution timestamp used in backup and archive names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const BACKUP_SUFFIX: &str = ".backup";
const TIMESTAMPED_PREFIX: &str = ".backup_";
const CORRUPTED_PREFIX: &str = ".corrupted_";

/// Metadata about a timestamped backup
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// Timestamp encoded in the filename
    pub timestamp: String,
    /// When the backup was created, parsed from the filename
    pub created_at: NaiveDateTime,
    /// Last modification time on disk
    pub modified: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Paths written by one snapshot
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub fixed: PathBuf,
    pub timestamped: PathBuf,
    /// Timestamped backups removed by retention
    pub pruned: Vec<PathBuf>,
}

/// Creates snapshots and enforces retention
#[derive(Debug, Clone)]
pub struct BackupManager {
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(retention: BackupRetention) -> Self {
        Self { retention }
    }

    /// Snapshot `file` to the fixed-name and a timestamped backup
    ///
    /// Returns `None` when there is nothing to back up yet.
    pub fn snapshot(&self, file: &Path) -> JournalResult<Option<Snapshot>> {
        if !file.exists() {
            debug!(file = %file.display(), "no file to back up yet");
            return Ok(None);
        }

        let fixed = fixed_backup_path(file);
        copy_atomic(file, &fixed)?;

        let timestamped = timestamped_backup_path(file, Local::now());
        copy_atomic(file, &timestamped)?;

        let pruned = self.enforce_retention(file)?;

        info!(
            file = %file.display(),
            backup = %timestamped.display(),
            pruned = pruned.len(),
            "snapshot created"
        );

        Ok(Some(Snapshot {
            fixed,
            timestamped,
            pruned,
        }))
    }

    /// List timestamped backups of `file`, most recently modified first
    pub fn list_backups(&self, file: &Path) -> JournalResult<Vec<BackupInfo>> {
        let dir = match file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let prefix = format!("{}{}", file_name(file)?, TIMESTAMPED_PREFIX);
        let mut backups = Vec::new();

        for entry in fs::read_dir(&dir)
            .map_err(|e| JournalError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| JournalError::Io(format!("Failed to read directory entry: {}", e)))?;

            let filename = entry.file_name().to_string_lossy().to_string();
            if let Some(info) = parse_backup_info(&entry.path(), &filename, &prefix) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        Ok(backups)
    }

    /// Delete all but the most recently modified timestamped backups
    pub fn enforce_retention(&self, file: &Path) -> JournalResult<Vec<PathBuf>> {
        let backups = self.list_backups(file)?;
        let mut deleted = Vec::new();

        // The newest backup always survives, even with a zero keep count
        for backup in backups.into_iter().skip(self.retention.keep_count.max(1)) {
            fs::remove_file(&backup.path)
                .map_err(|e| JournalError::Io(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }

        if !deleted.is_empty() {
            debug!(count = deleted.len(), "pruned old backups");
        }

        Ok(deleted)
    }

    /// The fixed-name backup, if present
    pub fn fixed_backup(&self, file: &Path) -> Option<PathBuf> {
        let path = fixed_backup_path(file);
        path.exists().then_some(path)
    }

    /// Get the most recent timestamped backup
    pub fn latest_backup(&self, file: &Path) -> JournalResult<Option<BackupInfo>> {
        Ok(self.list_backups(file)?.into_iter().next())
    }

    /// Get a timestamped backup by its `YYYYMMDD_HHMMSS` stamp
    pub fn find_backup(&self, file: &Path, timestamp: &str) -> JournalResult<Option<BackupInfo>> {
        Ok(self
            .list_backups(file)?
            .into_iter()
            .find(|b| b.timestamp == timestamp.trim()))
    }
}

/// `<file>.backup`
pub fn fixed_backup_path(file: &Path) -> PathBuf {
    with_suffix(file, BACKUP_SUFFIX)
}

/// `<file>.backup_<YYYYMMDD_HHMMSS>`
pub fn timestamped_backup_path(file: &Path, at: DateTime<Local>) -> PathBuf {
    with_suffix(
        file,
        &format!("{}{}", TIMESTAMPED_PREFIX, at.format(TIMESTAMP_FORMAT)),
    )
}

/// `<file>.corrupted_<YYYYMMDD_HHMMSS>`
pub fn corrupted_archive_path(file: &Path, at: DateTime<Local>) -> PathBuf {
    with_suffix(
        file,
        &format!("{}{}", CORRUPTED_PREFIX, at.format(TIMESTAMP_FORMAT)),
    )
}

fn with_suffix(file: &Path, suffix: &str) -> PathBuf {
    let mut name = file.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn file_name(file: &Path) -> JournalResult<String> {
    file.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| JournalError::Storage(format!("Not a file path: {}", file.display())))
}

fn parse_backup_info(path: &Path, filename: &str, prefix: &str) -> Option<BackupInfo> {
    let timestamp = filename.strip_prefix(prefix)?;
    let created_at = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;

    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    let modified: DateTime<Utc> = metadata.modified().ok()?.into();

    Some(BackupInfo {
        filename: filename.to_string(),
        path: path.to_path_buf(),
        timestamp: timestamp.to_string(),
        created_at,
        modified,
        size_bytes: metadata.len(),
    })
}
