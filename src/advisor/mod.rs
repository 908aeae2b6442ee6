//! Plant identification and companion-planting helpers
//!
//! The model call itself happens outside this crate. What lives here is the
//! handling on either side of it: the farmland history passed in as
//! context, and the parsing of the free-text replies that come back.

pub mod history;
pub mod response;

pub use history::HistoricalContext;
pub use response::{
    extract_json_block, parse_identified_crops, parse_recommendations, IdentifiedCrop,
    Recommendation,
};
