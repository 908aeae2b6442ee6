//! Audit trail for diary changes
//!
//! Every entry creation, edit, deletion, and document restore is appended
//! to `audit.log` as one JSON object per line.
//!
//! - `AuditEntry`: one recorded change, with before/after snapshots
//! - `AuditLogger`: appends entries to the log and reads them back
//! - `generate_diff`: one-line summary of the fields an edit touched
//!
//! # Example
//!
//! ```rust,ignore
//! use cropjournal::audit::{AuditEntry, AuditLogger, EntityType, generate_diff};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Entry,
//!     entry.id.as_str(),
//!     Some(entry.crop_type.clone()),
//!     &entry,
//! ))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
