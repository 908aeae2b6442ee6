//! Export CLI command

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{JournalError, JournalResult};
use crate::export::{export_entries_csv, export_native_json, export_yaml, ExportFormat};
use crate::storage::Storage;

/// Export the diary to `output`, or stdout when unset
pub fn handle_export_command(
    storage: &Storage,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> JournalResult<()> {
    let document = storage.diary().try_load()?;

    match &output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                JournalError::Export(format!("Cannot create {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(&document, format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| JournalError::Export(e.to_string()))?;
            report(path, format, document.entries.len());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_export(&document, format, &mut handle)?;
            writeln!(handle).map_err(|e| JournalError::Export(e.to_string()))?;
        }
    }

    Ok(())
}

fn write_export<W: Write>(
    document: &crate::models::DiaryDocument,
    format: ExportFormat,
    writer: &mut W,
) -> JournalResult<()> {
    match format {
        ExportFormat::Json => export_native_json(document, writer, true),
        ExportFormat::Csv => export_entries_csv(&document.entries, writer).map(|_| ()),
        ExportFormat::Yaml => export_yaml(document, writer),
    }
}

fn report(path: &Path, format: ExportFormat, entries: usize) {
    eprintln!(
        "Exported {} entries as {} to {}",
        entries,
        format,
        path.display()
    );
}
