//! Service layer for Crop Journal
//!
//! The service layer provides business logic on top of the storage layer:
//! validation before writes, listing with filters and pages, and
//! statistics.

pub mod entry;
pub mod query;
pub mod stats;

pub use entry::EntryService;
pub use query::{paginate, EntryFilter, Page, PageInfo, PageRequest};
pub use stats::Statistics;
