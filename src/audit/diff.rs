//! One-line change summaries for audited edits

use serde_json::Value;

/// Fields that change on every edit and carry no user intent
const BOOKKEEPING_FIELDS: [&str; 1] = ["last_modified"];

const MAX_VALUE_CHARS: usize = 50;

/// Summarize top-level field changes between two serialized entries
///
/// Returns `None` when nothing but bookkeeping fields changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return (before != after)
            .then(|| format!("{} -> {}", format_value(before), format_value(after)));
    };

    let mut changes = Vec::new();

    for (key, before_val) in before_obj {
        if BOOKKEEPING_FIELDS.contains(&key.as_str()) {
            continue;
        }
        match after_obj.get(key) {
            Some(after_val) if after_val != before_val => changes.push(format!(
                "{}: {} -> {}",
                key,
                format_value(before_val),
                format_value(after_val)
            )),
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, format_value(before_val))),
        }
    }

    for (key, after_val) in after_obj {
        if !before_obj.contains_key(key) && !BOOKKEEPING_FIELDS.contains(&key.as_str()) {
            changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_VALUE_CHARS => {
            let head: String = s.chars().take(MAX_VALUE_CHARS - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_field_only() {
        let before = json!({"crop_type": "Tomato", "observations": "Budding"});
        let after = json!({"crop_type": "Tomato", "observations": "Flowering"});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "observations: \"Budding\" -> \"Flowering\"");
    }

    #[test]
    fn test_optional_fields_added_and_removed() {
        let before = json!({"weather": "Sunny"});
        let after = json!({"location": "Plot 4"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("weather: \"Sunny\" -> (removed)"));
        assert!(diff.contains("location: (added) -> \"Plot 4\""));
    }

    #[test]
    fn test_bookkeeping_changes_are_ignored() {
        let before = json!({"crop_type": "Kale"});
        let after = json!({"crop_type": "Kale", "last_modified": "2025-06-02T00:00:00Z"});

        assert!(generate_diff(&before, &after).is_none());
    }

    #[test]
    fn test_lists_are_summarized() {
        let before = json!({"actions_taken": ["Watered"]});
        let after = json!({"actions_taken": ["Watered", "Weeded", "Mulched"]});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("actions_taken: [1 items] -> [3 items]"));
    }

    #[test]
    fn test_long_multibyte_string_truncation() {
        let before = json!({"observations": "🌱".repeat(80)});
        let after = json!({"observations": "short"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!({"a": 1, "b": 2})), "{2 fields}");
    }
}
