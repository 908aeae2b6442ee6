//! Diary entry service
//!
//! Business logic for creating, editing, deleting, and listing entries. All
//! writes go through `DiaryStore::modify`, which serializes the
//! load-change-persist sequence and snapshots a backup first.

use chrono::{Local, NaiveDate, Utc};
use tracing::info;

use crate::audit::EntityType;
use crate::error::{JournalError, JournalResult};
use crate::models::{DiaryEntry, EntryFields, EntryId};
use crate::storage::Storage;
use crate::validation::ensure_valid;

use super::query::{paginate, EntryFilter, Page, PageRequest};
use super::stats::Statistics;

/// Service for diary entry management
pub struct EntryService<'a> {
    storage: &'a Storage,
}

impl<'a> EntryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and add a new entry
    pub fn create(&self, fields: EntryFields) -> JournalResult<DiaryEntry> {
        let date = ensure_valid(&fields, today())?;
        let entry = DiaryEntry::create(fields, date, self.storage.catalog(), Utc::now());

        let created = entry.clone();
        self.storage.diary().modify(move |doc| {
            doc.entries.push(entry);
            Ok(())
        })?;

        info!(id = %created.id, crop = %created.crop_type, "entry created");
        self.storage.log_create(
            EntityType::Entry,
            created.id.as_str(),
            Some(created.crop_type.clone()),
            &created,
        );

        Ok(created)
    }

    /// Get an entry by ID
    pub fn get(&self, id: &EntryId) -> JournalResult<DiaryEntry> {
        self.storage
            .diary()
            .try_load()?
            .find(id)
            .cloned()
            .ok_or_else(|| JournalError::entry_not_found(id.as_str()))
    }

    /// Resolve a full ID or a unique ID prefix
    pub fn resolve_id(&self, identifier: &str) -> JournalResult<EntryId> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(JournalError::Validation("Entry ID cannot be empty".into()));
        }

        let doc = self.storage.diary().try_load()?;
        if let Some(entry) = doc.find(&EntryId::from_string(identifier)) {
            return Ok(entry.id.clone());
        }

        let mut matches = doc
            .entries
            .iter()
            .filter(|e| e.id.as_str().starts_with(identifier));
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry.id.clone()),
            (Some(_), Some(_)) => Err(JournalError::Validation(format!(
                "Entry ID prefix '{}' is ambiguous",
                identifier
            ))),
            (None, _) => Err(JournalError::entry_not_found(identifier)),
        }
    }

    /// Replace every field of an entry
    ///
    /// The id and creation timestamp are kept; category and stage labels are
    /// resolved again from the new values.
    pub fn update(&self, id: &EntryId, fields: EntryFields) -> JournalResult<DiaryEntry> {
        let catalog = self.storage.catalog();

        let (before, after) = self.storage.diary().modify(|doc| {
            let index = doc
                .position(id)
                .ok_or_else(|| JournalError::entry_not_found(id.as_str()))?;
            let date = ensure_valid(&fields, today())?;

            let before = doc.entries[index].clone();
            let after = before.replace_with(fields, date, catalog, Utc::now());
            doc.entries[index] = after.clone();
            Ok((before, after))
        })?;

        info!(id = %after.id, crop = %after.crop_type, "entry updated");
        self.storage.log_update(
            EntityType::Entry,
            after.id.as_str(),
            Some(after.crop_type.clone()),
            &before,
            &after,
        );

        Ok(after)
    }

    /// Remove an entry, returning it
    pub fn delete(&self, id: &EntryId) -> JournalResult<DiaryEntry> {
        let removed = self.storage.diary().modify(|doc| {
            let index = doc
                .position(id)
                .ok_or_else(|| JournalError::entry_not_found(id.as_str()))?;
            Ok(doc.entries.remove(index))
        })?;

        info!(id = %removed.id, crop = %removed.crop_type, "entry deleted");
        self.storage.log_delete(
            EntityType::Entry,
            removed.id.as_str(),
            Some(removed.crop_type.clone()),
            &removed,
        );

        Ok(removed)
    }

    /// Filter, sort newest first, and return one page
    pub fn list(&self, filter: &EntryFilter, request: PageRequest) -> JournalResult<Page<DiaryEntry>> {
        filter.check()?;
        let (page, per_page) = request.resolve(&self.storage.settings().pagination);

        let doc = self.storage.diary().try_load()?;
        let matched: Vec<DiaryEntry> = filter.apply(&doc.entries).into_iter().cloned().collect();

        paginate(matched, page, per_page)
    }

    /// Counts across the whole diary
    pub fn stats(&self) -> JournalResult<Statistics> {
        let doc = self.storage.diary().try_load()?;
        Ok(Statistics::compute(
            &doc.entries,
            today(),
            self.storage.settings().recent_days,
        ))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::{JournalPaths, Settings};
    use crate::models::DiaryDocument;
    use crate::storage::read_json;
    use crate::validation::Violation;
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = JournalPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, Settings::default()).unwrap();
        (temp_dir, storage)
    }

    fn tomato() -> EntryFields {
        let mut fields = EntryFields::new("Tomato", "First flowers on the cherry plants");
        fields.growth_stage = "Flowering".into();
        fields.actions_taken = vec!["Watered".into(), "Staked".into()];
        fields
    }

    #[test]
    fn test_create_then_list() {
        let (_temp, storage) = create_test_storage();
        let service = EntryService::new(&storage);

        let entry = service.create(tomato()).unwrap();
        assert_eq!(entry.crop_category.key, "fruits");
        assert_eq!(entry.growth_stage_info.key, "flowering");
        assert_eq!(entry.date, today());

        let page = service
            .list(&EntryFilter::default(), PageRequest::default())
            .unwrap();
        assert_eq!(page.returned_entries, 1);
        assert_eq!(page.entries[0].id, entry.id);

        let second = service.create(tomato()).unwrap();
        assert_ne!(second.id, entry.id);
    }

    #[test]
    fn test_create_reports_every_violation() {
        let (_temp, storage) = create_test_storage();
        let service = EntryService::new(&storage);

        let err = service.create(EntryFields::default()).unwrap_err();
        let violations = err.violations().unwrap();
        assert!(violations.has_field("crop_type"));
        assert!(violations.has_field("observations"));

        let mut future = tomato();
        future.date = Some((today() + Duration::days(1)).format("%Y-%m-%d").to_string());
        let err = service.create(future).unwrap_err();
        assert!(matches!(
            err.violations().unwrap().violations()[0],
            Violation::FutureDate { .. }
        ));

        assert!(storage.load().entries.is_empty());
    }

    #[test]
    fn test_update_preserves_identity() {
        let (_temp, storage) = create_test_storage();
        let service = EntryService::new(&storage);
        let original = service.create(tomato()).unwrap();

        let mut fields = EntryFields::new("Basil", "Bolting in the heat");
        fields.growth_stage = "flowering".into();
        let updated = service.update(&original.id, fields).unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.timestamp, original.timestamp);
        assert!(updated.last_modified.unwrap() >= original.timestamp);
        assert_eq!(updated.crop_category.key, "herbs");
        // Whole-record replacement drops fields not resent
        assert!(updated.actions_taken.is_empty());
        assert_eq!(service.get(&original.id).unwrap(), updated);
    }

    #[test]
    fn test_update_missing_and_invalid() {
        let (_temp, storage) = create_test_storage();
        let service = EntryService::new(&storage);

        let missing = service.update(&EntryId::from_string("nope"), tomato());
        assert!(missing.unwrap_err().is_not_found());

        let entry = service.create(tomato()).unwrap();
        let mut bad = tomato();
        bad.observations = "x".repeat(2001);
        assert!(service.update(&entry.id, bad).unwrap_err().is_validation());
        assert_eq!(service.get(&entry.id).unwrap(), entry);
    }

    #[test]
    fn test_delete_removes_and_syncs_total() {
        let (_temp, storage) = create_test_storage();
        let service = EntryService::new(&storage);
        let keep = service.create(tomato()).unwrap();
        let gone = service.create(EntryFields::new("Kale", "Leaves")).unwrap();

        let removed = service.delete(&gone.id).unwrap();
        assert_eq!(removed.id, gone.id);

        let page = service
            .list(&EntryFilter::default(), PageRequest::default())
            .unwrap();
        assert!(page.entries.iter().all(|e| e.id != gone.id));
        assert_eq!(page.entries[0].id, keep.id);

        let on_disk: DiaryDocument = read_json(storage.paths().diary_file()).unwrap();
        assert_eq!(on_disk.metadata.total_entries, 1);

        assert!(service.delete(&gone.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_mutations_are_audited() {
        let (_temp, storage) = create_test_storage();
        let service = EntryService::new(&storage);
        let entry = service.create(tomato()).unwrap();
        service
            .update(&entry.id, EntryFields::new("Tomato", "Ripening"))
            .unwrap();
        service.delete(&entry.id).unwrap();

        let history = storage.audit().history_for(entry.id.as_str()).unwrap();
        let ops: Vec<_> = history.iter().map(|e| e.operation).collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);
        assert!(history[1]
            .diff_summary
            .as_deref()
            .unwrap()
            .contains("observations"));
    }

    #[test]
    fn test_list_filters_and_pages() {
        let (_temp, storage) = create_test_storage();
        let service = EntryService::new(&storage);
        for i in 0..12 {
            service
                .create(EntryFields::new("Corn", format!("Check {}", i)))
                .unwrap();
        }
        service.create(tomato()).unwrap();

        let filter = EntryFilter {
            crop_type: Some("corn".into()),
            ..Default::default()
        };
        let first = service.list(&filter, PageRequest::page(1, 5)).unwrap();
        assert_eq!(first.pagination.total, 12);
        assert_eq!(first.pagination.total_pages, 3);
        assert_eq!(first.entries[0].observations, "Check 11");

        let legacy = service.list(&filter, PageRequest::offset(10, 5)).unwrap();
        assert_eq!(legacy.pagination.page, 3);
        assert_eq!(legacy.returned_entries, 2);

        assert!(matches!(
            service.list(&filter, PageRequest::page(4, 5)),
            Err(JournalError::PageOutOfRange { .. })
        ));
    }

    #[test]
    fn test_resolve_id_by_prefix() {
        let (_temp, storage) = create_test_storage();
        let service = EntryService::new(&storage);
        let entry = service.create(tomato()).unwrap();

        assert_eq!(service.resolve_id(entry.id.as_str()).unwrap(), entry.id);
        assert_eq!(service.resolve_id(entry.id.short()).unwrap(), entry.id);
        assert!(service.resolve_id("zzzz").unwrap_err().is_not_found());
        assert!(service.resolve_id(" ").unwrap_err().is_validation());
    }

    #[test]
    fn test_stats() {
        let (_temp, storage) = create_test_storage();
        let service = EntryService::new(&storage);
        service.create(tomato()).unwrap();
        service.create(EntryFields::new("tomato", "Leaf curl")).unwrap();

        let stats = service.stats().unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.by_crop["tomato"], 2);
        assert_eq!(stats.recent_entries, 2);
    }
}
