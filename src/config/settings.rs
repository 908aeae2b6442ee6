//! User settings for Crop Journal
//!
//! Manages cache, backup retention, pagination defaults, and the optional
//! custom crop catalog.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::JournalPaths;
use crate::error::JournalError;
use crate::models::CropCatalog;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of timestamped backups to keep
    pub keep_count: usize,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self { keep_count: 10 }
    }
}

/// Listing defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationSettings {
    #[serde(default = "default_per_page")]
    pub default_per_page: usize,
    #[serde(default = "default_max_per_page")]
    pub max_per_page: usize,
}

fn default_per_page() -> usize {
    10
}

fn default_max_per_page() -> usize {
    100
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
        }
    }
}

/// Settings for calls to the plant identification model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorSettings {
    /// Upper bound on any single model request
    #[serde(default = "default_advisor_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_advisor_timeout() -> u64 {
    30
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl AdvisorSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_advisor_timeout(),
            model: default_model(),
        }
    }
}

/// User settings for Crop Journal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// How long a cached document stays fresh, in seconds
    #[serde(default = "default_cache_freshness")]
    pub cache_freshness_secs: u64,

    #[serde(default)]
    pub backup_retention: BackupRetention,

    #[serde(default)]
    pub pagination: PaginationSettings,

    /// Window used by the "recent entries" statistic
    #[serde(default = "default_recent_days")]
    pub recent_days: i64,

    /// Custom crop catalog; the built-in one is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<PathBuf>,

    #[serde(default)]
    pub advisor: AdvisorSettings,
}

/// Upper bound for `recent_days`, roughly a century
pub const MAX_RECENT_DAYS: i64 = 36_500;

fn default_schema_version() -> u32 {
    1
}

fn default_cache_freshness() -> u64 {
    30
}

fn default_recent_days() -> i64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            cache_freshness_secs: default_cache_freshness(),
            backup_retention: BackupRetention::default(),
            pagination: PaginationSettings::default(),
            recent_days: default_recent_days(),
            catalog_file: None,
            advisor: AdvisorSettings::default(),
        }
    }
}

impl Settings {
    pub fn cache_freshness(&self) -> Duration {
        Duration::from_secs(self.cache_freshness_secs)
    }

    /// Load the configured crop catalog, or the built-in one
    pub fn crop_catalog(&self) -> Result<CropCatalog, JournalError> {
        match &self.catalog_file {
            Some(path) => CropCatalog::load(path),
            None => Ok(CropCatalog::default()),
        }
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &JournalPaths) -> Result<Self, JournalError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| JournalError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                JournalError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.check()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Reject values the rest of the journal cannot work with
    pub fn check(&self) -> Result<(), JournalError> {
        if self.backup_retention.keep_count == 0 {
            return Err(JournalError::Config(
                "backup_retention.keep_count must be at least 1".into(),
            ));
        }
        if !(0..=MAX_RECENT_DAYS).contains(&self.recent_days) {
            return Err(JournalError::Config(format!(
                "recent_days must be between 0 and {}, got {}",
                MAX_RECENT_DAYS, self.recent_days
            )));
        }
        if self.pagination.default_per_page == 0 || self.pagination.max_per_page == 0 {
            return Err(JournalError::Config(
                "pagination sizes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &JournalPaths) -> Result<(), JournalError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| JournalError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| JournalError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
