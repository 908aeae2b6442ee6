//! YAML export of the native document

use std::io::Write;

use crate::error::{JournalError, JournalResult};
use crate::models::DiaryDocument;

/// Write the document as YAML under a short comment header
pub fn export_yaml<W: Write>(document: &DiaryDocument, writer: &mut W) -> JournalResult<()> {
    let export_err = |e: std::io::Error| JournalError::Export(e.to_string());

    writeln!(writer, "# Crop Journal diary export").map_err(export_err)?;
    writeln!(writer, "# Entries: {}", document.entries.len()).map_err(export_err)?;
    writeln!(
        writer,
        "# Last updated: {}",
        document.metadata.last_updated.to_rfc3339()
    )
    .map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, document).map_err(|e| JournalError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CropCatalog, DiaryEntry, EntryFields};
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_yaml_export_reads_back() {
        let mut doc = DiaryDocument::empty();
        doc.entries.push(DiaryEntry::create(
            EntryFields::new("Onion", "Tops falling over"),
            NaiveDate::from_ymd_opt(2025, 8, 10).unwrap(),
            &CropCatalog::default(),
            Utc::now(),
        ));
        doc.touch(Utc::now());

        let mut output = Vec::new();
        export_yaml(&doc, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.starts_with("# Crop Journal diary export"));
        assert!(text.contains("# Entries: 1"));
        let parsed: DiaryDocument = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed.entries, doc.entries);
    }
}
