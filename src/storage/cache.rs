//! In-memory document cache
//!
//! Holds the last loaded document together with the file's modification
//! time at load. A cached copy is served only while it is younger than the
//! freshness window and the file's mtime still matches. This is a freshness
//! heuristic, not a guard against other processes writing the file.

use std::time::{Duration, Instant, SystemTime};

use crate::models::DiaryDocument;

#[derive(Debug, Clone)]
struct CacheEntry {
    document: DiaryDocument,
    source_mtime: SystemTime,
    loaded_at: Instant,
}

/// Single-slot cache for the diary document
#[derive(Debug)]
pub struct DocumentCache {
    slot: Option<CacheEntry>,
    freshness: Duration,
}

impl DocumentCache {
    pub fn new(freshness: Duration) -> Self {
        Self {
            slot: None,
            freshness,
        }
    }

    /// Return the cached document if still fresh for `current_mtime`
    pub fn get(&self, current_mtime: Option<SystemTime>) -> Option<DiaryDocument> {
        self.get_at(current_mtime, Instant::now())
    }

    fn get_at(&self, current_mtime: Option<SystemTime>, now: Instant) -> Option<DiaryDocument> {
        let entry = self.slot.as_ref()?;
        let current_mtime = current_mtime?;

        if now.duration_since(entry.loaded_at) >= self.freshness {
            return None;
        }
        if entry.source_mtime != current_mtime {
            return None;
        }

        Some(entry.document.clone())
    }

    /// Store a freshly loaded document
    pub fn put(&mut self, document: DiaryDocument, source_mtime: SystemTime) {
        self.slot = Some(CacheEntry {
            document,
            source_mtime,
            loaded_at: Instant::now(),
        });
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    #[cfg(test)]
    pub fn is_populated(&self) -> bool {
        self.slot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_misses() {
        let cache = DocumentCache::new(Duration::from_secs(30));
        assert!(cache.get(Some(SystemTime::now())).is_none());
    }

    #[test]
    fn test_hit_when_fresh_and_unchanged() {
        let mtime = SystemTime::now();
        let mut cache = DocumentCache::new(Duration::from_secs(30));
        cache.put(DiaryDocument::empty(), mtime);

        assert!(cache.get(Some(mtime)).is_some());
    }

    #[test]
    fn test_miss_when_mtime_changes() {
        let mtime = SystemTime::now();
        let mut cache = DocumentCache::new(Duration::from_secs(30));
        cache.put(DiaryDocument::empty(), mtime);

        assert!(cache.get(Some(mtime + Duration::from_secs(1))).is_none());
        assert!(cache.get(None).is_none());
    }

    #[test]
    fn test_miss_when_stale() {
        let mtime = SystemTime::now();
        let mut cache = DocumentCache::new(Duration::from_secs(30));
        cache.put(DiaryDocument::empty(), mtime);

        let later = Instant::now() + Duration::from_secs(31);
        assert!(cache.get_at(Some(mtime), later).is_none());
    }

    #[test]
    fn test_invalidate() {
        let mtime = SystemTime::now();
        let mut cache = DocumentCache::new(Duration::from_secs(30));
        cache.put(DiaryDocument::empty(), mtime);
        assert!(cache.is_populated());

        cache.invalidate();
        assert!(!cache.is_populated());
        assert!(cache.get(Some(mtime)).is_none());
    }
}
