//! Diary document store
//!
//! Owns the single JSON document holding all diary entries. Reads go through
//! a small freshness cache; every write snapshots a backup, replaces the
//! file atomically, and drops the cache before returning.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::audit::{AuditEntry, AuditLogger};
use crate::backup::{BackupManager, RecoveryResult, RestoreManager, Snapshot};
use crate::error::{JournalError, JournalResult};
use crate::models::DiaryDocument;

use super::cache::DocumentCache;
use super::file_io::{modified_time, read_json, write_json_atomic};

/// Store for the diary document
pub struct DiaryStore {
    path: PathBuf,
    cache: Mutex<DocumentCache>,
    /// Serializes load-modify-persist sequences and recovery
    write_lock: Mutex<()>,
    backups: BackupManager,
    restore: RestoreManager,
    /// Receives a restore record for every recovery, manual or automatic
    audit: Option<AuditLogger>,
}

impl DiaryStore {
    /// Create a store for the document at `path`
    pub fn new(path: PathBuf, cache_freshness: Duration, backups: BackupManager) -> Self {
        Self {
            path,
            cache: Mutex::new(DocumentCache::new(cache_freshness)),
            write_lock: Mutex::new(()),
            restore: RestoreManager::new(backups.clone()),
            backups,
            audit: None,
        }
    }

    /// Record recoveries in `audit`
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Load the document, never failing
    ///
    /// When the document cannot be loaded or recovered, an empty document
    /// carrying the error in `metadata.error` is returned instead.
    pub fn load(&self) -> DiaryDocument {
        match self.try_load() {
            Ok(doc) => doc,
            Err(e) => {
                error!(file = %self.path.display(), error = %e, "failed to load diary");
                DiaryDocument::with_error(e.to_string())
            }
        }
    }

    /// Load the document, reporting failures
    pub fn try_load(&self) -> JournalResult<DiaryDocument> {
        let _guard = self.lock_writes()?;
        self.load_unlocked()
    }

    /// Load, apply `f`, and persist as one serialized step
    ///
    /// Metadata counters are synced after `f` runs. If `f` fails nothing is
    /// written.
    pub fn modify<T, F>(&self, f: F) -> JournalResult<T>
    where
        F: FnOnce(&mut DiaryDocument) -> JournalResult<T>,
    {
        let _guard = self.lock_writes()?;
        let mut doc = self.load_unlocked()?;

        let output = f(&mut doc)?;

        doc.touch(Utc::now());
        self.persist_unlocked(&doc)?;
        Ok(output)
    }

    /// Snapshot the current document on demand
    pub fn backup(&self) -> JournalResult<Option<Snapshot>> {
        let _guard = self.lock_writes()?;
        self.backups.snapshot(&self.path)
    }

    /// Restore the document from a backup and drop the cache
    pub fn recover(&self, timestamp: Option<&str>) -> JournalResult<RecoveryResult> {
        let _guard = self.lock_writes()?;
        let result = self.restore.recover(&self.path, timestamp);
        self.invalidate()?;
        let result = result?;
        self.record_restore(&result);
        Ok(result)
    }

    /// Drop any cached copy of the document
    pub fn invalidate(&self) -> JournalResult<()> {
        self.lock_cache()?.invalidate();
        Ok(())
    }

    fn load_unlocked(&self) -> JournalResult<DiaryDocument> {
        let mtime = modified_time(&self.path)?;

        if let Some(doc) = self.lock_cache()?.get(mtime) {
            debug!(file = %self.path.display(), "diary cache hit");
            return Ok(doc);
        }

        if mtime.is_none() {
            info!(file = %self.path.display(), "creating empty diary document");
            let doc = DiaryDocument::empty();
            write_json_atomic(&self.path, &doc)?;
            self.remember(&doc)?;
            return Ok(doc);
        }

        match read_json::<DiaryDocument, _>(&self.path) {
            Ok(doc) => {
                self.remember(&doc)?;
                Ok(doc)
            }
            Err(JournalError::Corruption(reason)) => {
                warn!(file = %self.path.display(), %reason, "diary corrupted, attempting recovery");
                self.invalidate()?;
                let result = self.restore.recover(&self.path, None)?;
                info!("{}", result.summary());
                self.record_restore(&result);

                let doc: DiaryDocument = read_json(&self.path)?;
                self.remember(&doc)?;
                Ok(doc)
            }
            Err(e) => Err(e),
        }
    }

    fn persist_unlocked(&self, doc: &DiaryDocument) -> JournalResult<()> {
        self.backups.snapshot(&self.path)?;

        let result = write_json_atomic(&self.path, doc);
        // Drop the cache even on failure; the next read goes to disk
        self.invalidate()?;
        result?;

        debug!(
            file = %self.path.display(),
            entries = doc.entries.len(),
            "diary persisted"
        );
        Ok(())
    }

    // The restored file is already in place, so a logging failure is
    // reported and swallowed.
    fn record_restore(&self, result: &RecoveryResult) {
        let Some(audit) = &self.audit else {
            return;
        };
        let entry = AuditEntry::restore(self.path.display().to_string(), result.summary());
        if let Err(e) = audit.log(&entry) {
            warn!(error = %e, "failed to write audit entry");
        }
    }

    fn remember(&self, doc: &DiaryDocument) -> JournalResult<()> {
        if let Some(mtime) = modified_time(&self.path)? {
            self.lock_cache()?.put(doc.clone(), mtime);
        }
        Ok(())
    }

    fn lock_cache(&self) -> JournalResult<MutexGuard<'_, DocumentCache>> {
        self.cache
            .lock()
            .map_err(|e| JournalError::Storage(format!("Failed to acquire cache lock: {}", e)))
    }

    fn lock_writes(&self) -> JournalResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| JournalError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::fixed_backup_path;
    use crate::config::settings::BackupRetention;
    use crate::models::{CropCatalog, DiaryEntry, EntryFields};
    use chrono::NaiveDate;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, DiaryStore) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("diary_entries.json");
        let store = DiaryStore::new(
            path,
            Duration::from_secs(30),
            BackupManager::new(BackupRetention::default()),
        );
        (temp_dir, store)
    }

    fn sample_entry(crop: &str) -> DiaryEntry {
        DiaryEntry::create(
            EntryFields::new(crop, "observed"),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            &CropCatalog::default(),
            Utc::now(),
        )
    }

    #[test]
    fn test_missing_file_creates_empty_document() {
        let (_temp, store) = create_test_store();

        let doc = store.load();
        assert!(doc.entries.is_empty());
        assert!(!doc.has_error());
        assert!(store.path().exists());
    }

    #[test]
    fn test_modify_persists_and_syncs_metadata() {
        let (_temp, store) = create_test_store();

        store
            .modify(|doc| {
                doc.entries.push(sample_entry("Kale"));
                doc.entries.push(sample_entry("Corn"));
                Ok(())
            })
            .unwrap();

        let on_disk: DiaryDocument = read_json(store.path()).unwrap();
        assert_eq!(on_disk.entries.len(), 2);
        assert_eq!(on_disk.metadata.total_entries, 2);
        assert_eq!(store.load(), on_disk);
    }

    #[test]
    fn test_failed_modify_writes_nothing() {
        let (_temp, store) = create_test_store();
        store.load();
        let before = fs::read_to_string(store.path()).unwrap();

        let result: JournalResult<()> = store.modify(|doc| {
            doc.entries.push(sample_entry("Kale"));
            Err(JournalError::entry_not_found("x"))
        });

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_write_invalidates_cache() {
        let (_temp, store) = create_test_store();
        assert!(store.load().entries.is_empty());

        store
            .modify(|doc| {
                doc.entries.push(sample_entry("Kale"));
                Ok(())
            })
            .unwrap();

        assert!(!store.lock_cache().unwrap().is_populated());
        assert_eq!(store.load().entries.len(), 1);
    }

    #[test]
    fn test_writes_snapshot_previous_version() {
        let (_temp, store) = create_test_store();
        store
            .modify(|doc| {
                doc.entries.push(sample_entry("Kale"));
                Ok(())
            })
            .unwrap();
        store
            .modify(|doc| {
                doc.entries.push(sample_entry("Corn"));
                Ok(())
            })
            .unwrap();

        let backup: DiaryDocument = read_json(fixed_backup_path(store.path())).unwrap();
        assert_eq!(backup.entries.len(), 1);
        assert!(!store.backups().list_backups(store.path()).unwrap().is_empty());
    }

    #[test]
    fn test_corruption_recovers_from_backup() {
        let (temp, store) = create_test_store();
        store
            .modify(|doc| {
                doc.entries.push(sample_entry("Kale"));
                Ok(())
            })
            .unwrap();
        // Second write leaves the one-entry version as the fixed backup
        store
            .modify(|doc| {
                doc.entries.push(sample_entry("Corn"));
                Ok(())
            })
            .unwrap();

        fs::write(store.path(), "{ this is not json").unwrap();
        store.invalidate().unwrap();

        let doc = store.load();
        assert!(!doc.has_error());
        assert_eq!(doc.entries.len(), 1);
        assert_eq!(doc.entries[0].crop_type, "Kale");

        let archived = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with("diary_entries.json.corrupted_")
            });
        assert!(archived);
    }

    #[test]
    fn test_unrecoverable_corruption_returns_error_document() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), "garbage").unwrap();

        let doc = store.load();
        assert!(doc.has_error());
        assert!(doc.entries.is_empty());
        // The corrupt file is left alone
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "garbage");

        let err = store
            .modify(|doc| {
                doc.entries.push(sample_entry("Kale"));
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, JournalError::Recovery(_)));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "garbage");
    }

    #[test]
    fn test_external_change_is_picked_up() {
        let (_temp, store) = create_test_store();
        store.load();

        let mut doc = DiaryDocument::empty();
        doc.entries.push(sample_entry("Pea"));
        doc.touch(Utc::now());
        // Make sure the mtime moves even on coarse-grained filesystems
        std::thread::sleep(Duration::from_millis(1100));
        write_json_atomic(store.path(), &doc).unwrap();

        assert_eq!(store.load().entries.len(), 1);
    }

    #[test]
    fn test_concurrent_modifications_are_not_lost() {
        let (_temp, store) = create_test_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .modify(|doc| {
                            doc.entries.push(sample_entry(&format!("Crop {}", i)));
                            Ok(())
                        })
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let doc = store.load();
        assert_eq!(doc.entries.len(), 8);
        assert_eq!(doc.metadata.total_entries, 8);
    }

    #[test]
    fn test_manual_recover() {
        let (_temp, store) = create_test_store();
        store
            .modify(|doc| {
                doc.entries.push(sample_entry("Kale"));
                Ok(())
            })
            .unwrap();
        store
            .modify(|doc| {
                doc.entries.clear();
                Ok(())
            })
            .unwrap();
        assert!(store.load().entries.is_empty());

        let result = store.recover(None).unwrap();
        assert_eq!(result.entries_restored, 1);
        assert_eq!(store.load().entries.len(), 1);
    }
}
