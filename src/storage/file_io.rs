//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::JournalError;

/// Read and parse a JSON file
///
/// Open and read failures map to `Storage`, parse failures to `Corruption`,
/// so callers can tell a damaged document from an unreachable one.
pub fn read_json<T, P>(path: P) -> Result<T, JournalError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| JournalError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            JournalError::Storage(format!("Failed to read {}: {}", path.display(), e))
        } else {
            JournalError::Corruption(format!("Failed to parse {}: {}", path.display(), e))
        }
    })
}

/// Read a JSON file as an untyped value
pub fn read_json_value<P: AsRef<Path>>(path: P) -> Result<serde_json::Value, JournalError> {
    read_json(path)
}

/// Temp file path used while writing `path`
///
/// Lives in the same directory, which the atomic rename relies on.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("document"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The target is either completely replaced or left as it was. Any temp
/// file is removed when a step fails.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), JournalError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            JournalError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path(path);

    if let Err(e) = write_temp(&temp_path, data) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        JournalError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

fn write_temp<T: Serialize>(temp_path: &Path, data: &T) -> Result<(), JournalError> {
    let file = File::create(temp_path)
        .map_err(|e| JournalError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| JournalError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| JournalError::Storage(format!("Failed to flush data: {}", e)))?;

    // Sync to disk before rename
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| JournalError::Storage(format!("Failed to sync data: {}", e)))?;

    Ok(())
}

/// Copy `from` over `to` through a temp file, so `to` is never half-written
pub fn copy_atomic(from: &Path, to: &Path) -> Result<u64, JournalError> {
    let temp_path = temp_path(to);
    let bytes = fs::copy(from, &temp_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        JournalError::Storage(format!(
            "Failed to copy {} to {}: {}",
            from.display(),
            to.display(),
            e
        ))
    })?;

    fs::rename(&temp_path, to).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        JournalError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(bytes)
}

/// Modification time of a file, or `None` if it does not exist
pub fn modified_time(path: &Path) -> Result<Option<SystemTime>, JournalError> {
    match fs::metadata(path) {
        Ok(meta) => meta.modified().map(Some).map_err(|e| {
            JournalError::Storage(format!(
                "Failed to read modification time of {}: {}",
                path.display(),
                e
            ))
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(JournalError::Storage(format!(
            "Failed to stat {}: {}",
            path.display(),
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn sample() -> TestData {
        TestData {
            name: "test".to_string(),
            value: 42,
        }
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        write_json_atomic(&path, &sample()).unwrap();
        assert!(path.exists());

        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(sample(), loaded);
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        write_json_atomic(&path, &sample()).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("test.json.tmp").exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.json");

        write_json_atomic(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_write_leaves_target_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");
        fs::write(&path, r#"{"name":"old","value":1}"#).unwrap();

        // A directory where the temp file should go makes File::create fail
        fs::create_dir(temp_path(&path)).unwrap();
        assert!(write_json_atomic(&path, &sample()).is_err());

        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(loaded.name, "old");
    }

    #[test]
    fn test_read_errors_are_classified() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        let broken = temp_dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();

        assert!(matches!(
            read_json::<TestData, _>(&missing),
            Err(JournalError::Storage(_))
        ));
        assert!(matches!(
            read_json::<TestData, _>(&broken),
            Err(JournalError::Corruption(_))
        ));
    }

    #[test]
    fn test_copy_atomic() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("a.json");
        let to = temp_dir.path().join("b.json");
        fs::write(&from, "{}").unwrap();

        assert_eq!(copy_atomic(&from, &to).unwrap(), 2);
        assert_eq!(fs::read_to_string(&to).unwrap(), "{}");
        assert!(!temp_path(&to).exists());
    }

    #[test]
    fn test_modified_time() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.json");
        assert_eq!(modified_time(&path).unwrap(), None);

        fs::write(&path, "{}").unwrap();
        assert!(modified_time(&path).unwrap().is_some());
    }
}
