//! Native JSON export
//!
//! The native form is the diary document itself, so an export can be read
//! back into exactly the entries it was written from.

use std::io::Write;

use crate::backup::validate_document_value;
use crate::error::{JournalError, JournalResult};
use crate::models::DiaryDocument;

/// Write the document in its native JSON form
pub fn export_native_json<W: Write>(
    document: &DiaryDocument,
    writer: &mut W,
    pretty: bool,
) -> JournalResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, document)
    } else {
        serde_json::to_writer(writer, document)
    }
    .map_err(|e| JournalError::Export(e.to_string()))
}

/// Read a native JSON export back into a document
///
/// The text must pass the same structural checks as the diary file itself.
pub fn read_native(json_str: &str) -> JournalResult<DiaryDocument> {
    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| JournalError::Export(format!("Export is not valid JSON: {}", e)))?;

    let validation = validate_document_value(&value);
    if !validation.valid {
        return Err(JournalError::Export(validation.summary()));
    }

    serde_json::from_value(value).map_err(|e| JournalError::Export(e.to_string()))
}
