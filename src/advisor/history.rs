//! Farmland history used as model context

use std::path::Path;

use serde_json::{json, Value};
use tracing::warn;

/// Historical notes about the growing area
///
/// Loading never fails: a missing or unreadable file is replaced by a
/// placeholder message so the advisor can still run without history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalContext {
    data: Value,
    available: bool,
}

impl HistoricalContext {
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Self::placeholder(format!(
                    "No historical data found. Please create {}.",
                    path.display()
                ));
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to read history");
                return Self::placeholder(format!("Error reading {}.", path.display()));
            }
        };

        match serde_json::from_str(&contents) {
            Ok(data) => Self {
                data,
                available: true,
            },
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to parse history");
                Self::placeholder(format!("Error decoding {}.", path.display()))
            }
        }
    }

    fn placeholder(message: String) -> Self {
        Self {
            data: json!({ "history": message }),
            available: false,
        }
    }

    /// Whether real history was loaded
    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Indented JSON for embedding in a request
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.data).unwrap_or_else(|_| self.data.to_string())
    }
}
