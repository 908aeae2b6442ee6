//! Core data models for Crop Journal
//!
//! This module contains the data structures of the diary domain: entries,
//! the persisted document, and the crop catalog used to label entries.

pub mod catalog;
pub mod document;
pub mod entry;
pub mod ids;

pub use catalog::{CategoryDefinition, CropCatalog, CropCategory, GrowthStageInfo};
pub use document::{DiaryDocument, DocumentMetadata, DOCUMENT_VERSION};
pub use entry::{DiaryEntry, EntryFields, EntrySummary};
pub use ids::EntryId;
