//! Data file integrity report
//!
//! Checks each known data file for existence, readability, and structure,
//! and rolls every issue found into one overall status.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::storage::file_io::read_json_value;

use super::manager::fixed_backup_path;
use super::validate::validate_document_value;

/// How a data file's contents are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// The diary document: full structural validation, must exist
    DiaryDocument,
    /// Any other JSON file: must parse if present
    OptionalJson,
}

/// Health of a single data file
#[derive(Debug, Clone, Serialize)]
pub struct FileHealth {
    pub path: PathBuf,
    pub kind: FileKind,
    pub exists: bool,
    pub readable: bool,
    pub valid: bool,
    pub size_bytes: Option<u64>,
    pub modified: Option<DateTime<Utc>>,
    pub has_backup: bool,
    pub issues: Vec<String>,
}

/// Overall status of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityStatus {
    Healthy,
    IssuesFound,
}

/// Integrity report across all data files
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub checked_at: DateTime<Utc>,
    pub status: IntegrityStatus,
    pub files: Vec<FileHealth>,
    pub issues: Vec<String>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.status == IntegrityStatus::Healthy
    }
}

/// Build a report for the given files
pub fn integrity_report(files: &[(PathBuf, FileKind)]) -> IntegrityReport {
    let files: Vec<FileHealth> = files
        .iter()
        .map(|(path, kind)| check_file(path, *kind))
        .collect();

    let issues: Vec<String> = files
        .iter()
        .flat_map(|f| {
            f.issues
                .iter()
                .map(move |issue| format!("{}: {}", f.path.display(), issue))
        })
        .collect();

    IntegrityReport {
        checked_at: Utc::now(),
        status: if issues.is_empty() {
            IntegrityStatus::Healthy
        } else {
            IntegrityStatus::IssuesFound
        },
        files,
        issues,
    }
}

fn check_file(path: &Path, kind: FileKind) -> FileHealth {
    let mut health = FileHealth {
        path: path.to_path_buf(),
        kind,
        exists: path.exists(),
        readable: false,
        valid: false,
        size_bytes: None,
        modified: None,
        has_backup: fixed_backup_path(path).exists(),
        issues: Vec::new(),
    };

    if !health.exists {
        if kind == FileKind::DiaryDocument {
            health.issues.push("file does not exist".into());
        }
        return health;
    }

    match fs::metadata(path) {
        Ok(meta) => {
            health.size_bytes = Some(meta.len());
            health.modified = meta.modified().ok().map(DateTime::<Utc>::from);
        }
        Err(e) => health.issues.push(format!("cannot stat file: {}", e)),
    }

    let value = match fs::File::open(path) {
        Ok(_) => {
            health.readable = true;
            read_json_value(path)
        }
        Err(e) => {
            health.issues.push(format!("file is not readable: {}", e));
            return health;
        }
    };

    match value {
        Ok(value) => {
            if kind == FileKind::DiaryDocument {
                let validation = validate_document_value(&value);
                health.valid = validation.valid;
                health.issues.extend(validation.issues);
            } else {
                health.valid = true;
            }
        }
        Err(e) => health.issues.push(e.to_string()),
    }

    if kind == FileKind::DiaryDocument && !health.has_backup {
        health.issues.push("no backup exists".into());
    }

    health
}
