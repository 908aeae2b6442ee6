//! Crop Journal - farm journaling diary store
//!
//! This library keeps a diary of crop observations in a single JSON
//! document. It validates entries before they are written, snapshots a
//! backup before every write, and recovers from the newest valid backup
//! when the document turns out to be corrupt.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Diary entries, the document, and the crop catalog
//! - `validation`: Entry field rules
//! - `storage`: Cached, atomically written document store
//! - `backup`: Snapshots, retention, recovery, and integrity checks
//! - `audit`: Append-only change log
//! - `services`: Entry CRUD, filtering, pagination, and statistics
//! - `export`: JSON, CSV, and YAML export
//! - `advisor`: Parsing of plant identification and companion-planting replies
//!
//! # Example
//!
//! ```rust,ignore
//! use cropjournal::models::EntryFields;
//! use cropjournal::services::EntryService;
//! use cropjournal::storage::Storage;
//!
//! let storage = Storage::open()?;
//! let entry = EntryService::new(&storage).create(EntryFields::new("Tomato", "First flowers"))?;
//! ```

pub mod advisor;
pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;
pub mod validation;

pub use error::{JournalError, JournalResult};
