//! Backup restoration for Crop Journal
//!
//! Restores the diary document from the fixed-name backup or from a
//! timestamped one. The chosen backup is validated first; if it is unusable
//! the primary file is left exactly as it was.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{JournalError, JournalResult};
use crate::models::DiaryDocument;
use crate::storage::file_io::{read_json, temp_path};

use super::manager::{corrupted_archive_path, BackupManager};
use super::validate::validate_document_file;

/// Result of a restore operation
#[derive(Debug, Clone, Serialize)]
pub struct RecoveryResult {
    /// Backup the document was restored from
    pub restored_from: PathBuf,
    /// Where the replaced primary file was archived, if one existed
    pub archived_primary: Option<PathBuf>,
    /// Number of entries in the restored document
    pub entries_restored: usize,
}

impl RecoveryResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Restored {} entries from {}",
            self.entries_restored,
            self.restored_from.display()
        );
        if let Some(archive) = &self.archived_primary {
            summary.push_str(&format!(
                " (previous file archived as {})",
                archive.display()
            ));
        }
        summary
    }
}

/// Handles restoring from backups
#[derive(Debug, Clone)]
pub struct RestoreManager {
    backups: BackupManager,
}

impl RestoreManager {
    pub fn new(backups: BackupManager) -> Self {
        Self { backups }
    }

    /// Restore `file` from a backup
    ///
    /// With no timestamp the fixed-name backup is used, falling back to the
    /// most recent timestamped backup when the fixed one is absent. With a
    /// timestamp, exactly that backup is used.
    pub fn recover(&self, file: &Path, timestamp: Option<&str>) -> JournalResult<RecoveryResult> {
        let backup = self.select_backup(file, timestamp)?;

        let document = self.validate_backup(&backup)?;

        // Stage the backup beside the primary first; the primary is only
        // replaced by the final rename
        let staged = temp_path(file);
        fs::copy(&backup, &staged).map_err(|e| {
            let _ = fs::remove_file(&staged);
            JournalError::Recovery(format!(
                "Failed to stage {} for restore: {}",
                backup.display(),
                e
            ))
        })?;

        let archived_primary = if file.exists() {
            let archive = corrupted_archive_path(file, Local::now());
            if let Err(e) = fs::copy(file, &archive) {
                let _ = fs::remove_file(&staged);
                return Err(JournalError::Recovery(format!(
                    "Failed to archive {} before restore: {}",
                    file.display(),
                    e
                )));
            }
            warn!(archive = %archive.display(), "archived replaced document");
            Some(archive)
        } else {
            None
        };

        fs::rename(&staged, file).map_err(|e| {
            let _ = fs::remove_file(&staged);
            JournalError::Recovery(format!(
                "Failed to restore {} from {}: {}",
                file.display(),
                backup.display(),
                e
            ))
        })?;

        info!(
            file = %file.display(),
            backup = %backup.display(),
            entries = document.entries.len(),
            "document restored from backup"
        );

        Ok(RecoveryResult {
            restored_from: backup,
            archived_primary,
            entries_restored: document.entries.len(),
        })
    }

    /// Check that a backup is structurally valid and loads as a document
    pub fn validate_backup(&self, backup: &Path) -> JournalResult<DiaryDocument> {
        let validation = validate_document_file(backup);
        if !validation.valid {
            return Err(JournalError::Recovery(format!(
                "Backup {} is not usable: {}",
                backup.display(),
                validation.issues.join("; ")
            )));
        }

        read_json(backup).map_err(|e| {
            JournalError::Recovery(format!("Backup {} is not usable: {}", backup.display(), e))
        })
    }

    fn select_backup(&self, file: &Path, timestamp: Option<&str>) -> JournalResult<PathBuf> {
        match timestamp {
            Some(ts) => self
                .backups
                .find_backup(file, ts)?
                .map(|b| b.path)
                .ok_or_else(|| JournalError::Recovery(format!("No backup with timestamp {}", ts))),
            None => {
                if let Some(fixed) = self.backups.fixed_backup(file) {
                    return Ok(fixed);
                }
                self.backups
                    .latest_backup(file)?
                    .map(|b| b.path)
                    .ok_or_else(|| {
                        JournalError::Recovery(format!(
                            "No backup available for {}",
                            file.display()
                        ))
                    })
            }
        }
    }
}
