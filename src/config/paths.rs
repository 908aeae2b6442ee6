//! Path management for Crop Journal
//!
//! ## Path Resolution Order
//!
//! 1. `CROP_JOURNAL_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `crop-journal`
//!    (`~/.config/crop-journal` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::JournalError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "CROP_JOURNAL_DATA_DIR";

/// Manages all paths used by Crop Journal
#[derive(Debug, Clone)]
pub struct JournalPaths {
    /// Base directory for all journal data
    base_dir: PathBuf,
}

impl JournalPaths {
    /// Create a new JournalPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// environment override is not set.
    pub fn new() -> Result<Self, JournalError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create JournalPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the diary document
    pub fn diary_file(&self) -> PathBuf {
        self.data_dir().join("diary_entries.json")
    }

    /// Get the path to the farmland history used as advisor context
    pub fn history_file(&self) -> PathBuf {
        self.data_dir().join("history.json")
    }

    /// Every data file covered by integrity checks
    pub fn data_files(&self) -> Vec<PathBuf> {
        vec![self.diary_file(), self.history_file()]
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), JournalError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| JournalError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| JournalError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, JournalError> {
    ProjectDirs::from("", "", "crop-journal")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| JournalError::Config("Could not determine a home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = JournalPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(
            paths.diary_file(),
            temp_dir.path().join("data").join("diary_entries.json")
        );
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var(DATA_DIR_ENV, custom_path);
        let paths = JournalPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());
        env::remove_var(DATA_DIR_ENV);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = JournalPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_data_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = JournalPaths::with_base_dir(temp_dir.path().to_path_buf());
        let files = paths.data_files();

        assert_eq!(files.len(), 2);
        assert!(files.contains(&paths.history_file()));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }
}
