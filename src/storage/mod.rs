//! Storage layer for Crop Journal
//!
//! Provides the diary document store with atomic writes, snapshot-on-write
//! backups, and automatic directory creation, plus the coordinator that
//! wires it to settings and the audit log.

pub mod cache;
pub mod diary;
pub mod file_io;

pub use diary::DiaryStore;
pub use file_io::{read_json, write_json_atomic};

use serde::Serialize;
use tracing::warn;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::backup::{
    integrity_report, validate_document_file, BackupInfo, BackupManager, DocumentValidation,
    FileKind, IntegrityReport, RecoveryResult, Snapshot,
};
use crate::config::{JournalPaths, Settings};
use crate::error::JournalResult;
use crate::models::{CropCatalog, DiaryDocument};

/// Main storage coordinator
pub struct Storage {
    paths: JournalPaths,
    settings: Settings,
    catalog: CropCatalog,
    diary: DiaryStore,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: JournalPaths, settings: Settings) -> JournalResult<Self> {
        paths.ensure_directories()?;

        let catalog = settings.crop_catalog()?;
        let audit = AuditLogger::new(paths.audit_log());
        let diary = DiaryStore::new(
            paths.diary_file(),
            settings.cache_freshness(),
            BackupManager::new(settings.backup_retention.clone()),
        )
        .with_audit(audit.clone());

        Ok(Self {
            audit,
            catalog,
            diary,
            settings,
            paths,
        })
    }

    /// Open storage at the default location with saved settings
    pub fn open() -> JournalResult<Self> {
        let paths = JournalPaths::new()?;
        let settings = Settings::load_or_create(&paths)?;
        Self::new(paths, settings)
    }

    pub fn paths(&self) -> &JournalPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &CropCatalog {
        &self.catalog
    }

    pub fn diary(&self) -> &DiaryStore {
        &self.diary
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load the diary document; never fails
    pub fn load(&self) -> DiaryDocument {
        self.diary.load()
    }

    /// Snapshot the diary now
    pub fn backup(&self) -> JournalResult<Option<Snapshot>> {
        self.diary.backup()
    }

    /// Timestamped diary backups, newest first
    pub fn list_backups(&self) -> JournalResult<Vec<BackupInfo>> {
        self.diary.backups().list_backups(self.diary.path())
    }

    /// Restore the diary from a backup
    pub fn recover(&self, timestamp: Option<&str>) -> JournalResult<RecoveryResult> {
        self.diary.recover(timestamp)
    }

    /// Structural validation of the diary file as it is on disk
    pub fn validate(&self) -> DocumentValidation {
        validate_document_file(self.diary.path())
    }

    /// Health of every known data file
    pub fn integrity_report(&self) -> IntegrityReport {
        integrity_report(&[
            (self.paths.diary_file(), FileKind::DiaryDocument),
            (self.paths.history_file(), FileKind::OptionalJson),
        ])
    }

    /// Record a created entity in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.record(&AuditEntry::create(entity_type, entity_id, entity_name, entity));
    }

    /// Record an edit, with a diff of the changed fields
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.record(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ));
    }

    /// Record a removed entity in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.record(&AuditEntry::delete(entity_type, entity_id, entity_name, entity));
    }

    // The change is already persisted when this runs, so a logging failure
    // is reported and swallowed.
    fn record(&self, entry: &AuditEntry) {
        if let Err(e) = self.audit.log(entry) {
            warn!(error = %e, "failed to write audit entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = JournalPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, Settings::default()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();

        assert!(temp_dir.path().join("data").exists());
        assert!(storage.load().entries.is_empty());
        assert!(storage.paths().diary_file().exists());
    }

    #[test]
    fn test_custom_catalog_is_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let catalog_path = temp_dir.path().join("catalog.json");
        fs::write(
            &catalog_path,
            serde_json::to_string(&CropCatalog::default()).unwrap(),
        )
        .unwrap();

        let settings = Settings {
            catalog_file: Some(catalog_path),
            ..Settings::default()
        };
        let paths = JournalPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, settings).unwrap();
        assert_eq!(storage.catalog().resolve_category("Basil").key, "herbs");
    }

    #[test]
    fn test_missing_catalog_fails_startup() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings {
            catalog_file: Some(temp_dir.path().join("missing.json")),
            ..Settings::default()
        };
        let paths = JournalPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert!(Storage::new(paths, settings).is_err());
    }

    #[test]
    fn test_integrity_report_after_first_load() {
        let (_temp, storage) = create_test_storage();
        storage.load();

        let report = storage.integrity_report();
        assert_eq!(report.files.len(), 2);
        // A fresh diary has no backup yet
        assert!(!report.is_healthy());

        storage.backup().unwrap();
        assert!(storage.integrity_report().is_healthy());
        assert!(storage.validate().valid);
    }

    #[test]
    fn test_recover_is_audited() {
        let (_temp, storage) = create_test_storage();
        storage.load();
        storage.backup().unwrap();
        assert_eq!(storage.list_backups().unwrap().len(), 1);

        storage.recover(None).unwrap();

        let logged = storage.audit().read_all().unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].operation, Operation::Restore);
    }

    #[test]
    fn test_automatic_recovery_is_audited() {
        let (_temp, storage) = create_test_storage();
        for crop in ["Kale", "Corn"] {
            storage
                .diary()
                .modify(|doc| {
                    doc.entries.push(crate::models::DiaryEntry::create(
                        crate::models::EntryFields::new(crop, "observed"),
                        chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                        storage.catalog(),
                        chrono::Utc::now(),
                    ));
                    Ok(())
                })
                .unwrap();
        }

        fs::write(storage.paths().diary_file(), "{ not json").unwrap();
        storage.diary().invalidate().unwrap();
        assert_eq!(storage.load().entries.len(), 1);

        let logged = storage.audit().read_all().unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].operation, Operation::Restore);
        assert_eq!(logged[0].entity_type, EntityType::Document);
        assert!(logged[0].diff_summary.as_deref().unwrap().contains("Restored 1 entries"));
    }
}
