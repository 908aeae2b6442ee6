//! Parsing of model replies

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{JournalError, JournalResult};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// A plant named in an identification reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedCrop {
    pub name: String,
    /// `crop_<line index>`, stable for a given reply
    pub id: String,
}

/// A suggested companion plant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub plant: String,
    pub reason: String,
}

#[derive(Deserialize)]
struct RecommendationList {
    recommendations: Vec<Recommendation>,
}

/// Read one plant per line from an identification reply
///
/// List markers (bullets, numbering) are stripped and blank lines skipped.
/// Ids use the line's position in the reply, so they may skip numbers.
pub fn parse_identified_crops(text: &str) -> JournalResult<Vec<IdentifiedCrop>> {
    let crops: Vec<IdentifiedCrop> = text
        .trim()
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let name = line
                .trim()
                .trim_start_matches(|c: char| matches!(c, '*' | '-' | '.' | ' ') || c.is_ascii_digit())
                .trim();
            (!name.is_empty()).then(|| IdentifiedCrop {
                name: name.to_string(),
                id: format!("crop_{}", index),
            })
        })
        .collect();

    if crops.is_empty() {
        return Err(JournalError::Advisor("Could not identify any crops".into()));
    }
    Ok(crops)
}

/// Pull the JSON object out of a reply and check it has `expected_keys`
///
/// A ```` ```json ```` fenced block is preferred; otherwise the text from the
/// first `{` to the last `}` is used.
pub fn extract_json_block(text: &str, expected_keys: &[&str]) -> JournalResult<Value> {
    let candidate = fenced_block(text)
        .or_else(|| brace_span(text))
        .ok_or_else(|| JournalError::Advisor("No JSON block found in response".into()))?;

    let value: Value = serde_json::from_str(candidate.trim())
        .map_err(|e| JournalError::Advisor(format!("Response JSON did not parse: {}", e)))?;

    let missing: Vec<&str> = expected_keys
        .iter()
        .copied()
        .filter(|key| value.get(key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(JournalError::Advisor(format!(
            "Response JSON is missing keys: {}",
            missing.join(", ")
        )));
    }

    Ok(value)
}

/// Parse a companion-planting reply
pub fn parse_recommendations(text: &str) -> JournalResult<Vec<Recommendation>> {
    let value = extract_json_block(text, &["recommendations"])?;
    let list: RecommendationList = serde_json::from_value(value)
        .map_err(|e| JournalError::Advisor(format!("Unexpected recommendation shape: {}", e)))?;
    Ok(list.recommendations)
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find(JSON_FENCE)? + JSON_FENCE.len();
    let rest = &text[start..];
    match rest.rfind(FENCE) {
        Some(end) => Some(&rest[..end]),
        None => brace_span(rest),
    }
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
