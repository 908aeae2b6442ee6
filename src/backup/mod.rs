//! Backup system for Crop Journal
//!
//! Provides snapshot-on-write backups, retention, validation, corruption
//! recovery, and integrity reporting for the diary document.
//!
//! # Architecture
//!
//! - `BackupManager`: Creates fixed-name and timestamped snapshots and
//!   prunes old timestamped copies
//! - `RestoreManager`: Validates a backup and restores the document from it
//! - `validate`: Structural checks on a document file
//! - `integrity`: Health report across all data files
//!
//! # Backup Layout
//!
//! Backups live next to the file they protect:
//! - `<file>.backup`: the most recent snapshot
//! - `<file>.backup_<YYYYMMDD_HHMMSS>`: timestamped snapshots (10 kept by default)
//! - `<file>.corrupted_<YYYYMMDD_HHMMSS>`: a primary file replaced during recovery
//!
//! # Example
//!
//! ```rust,ignore
//! use cropjournal::backup::{BackupManager, RestoreManager};
//! use cropjournal::config::settings::BackupRetention;
//!
//! let manager = BackupManager::new(BackupRetention::default());
//! manager.snapshot(&diary_file)?;
//!
//! let restore = RestoreManager::new(manager);
//! let result = restore.recover(&diary_file, None)?;
//! println!("{}", result.summary());
//! ```

pub mod integrity;
mod manager;
mod restore;
pub mod validate;

pub use integrity::{integrity_report, FileHealth, FileKind, IntegrityReport, IntegrityStatus};
pub use manager::{
    corrupted_archive_path, fixed_backup_path, timestamped_backup_path, BackupInfo,
    BackupManager, Snapshot, TIMESTAMP_FORMAT,
};
pub use restore::{RecoveryResult, RestoreManager};
pub use validate::{validate_document_file, validate_document_value, DocumentValidation};
