//! Entry validation
//!
//! Checks a candidate set of entry fields and reports every problem at once,
//! so a single round trip tells the caller all that needs fixing.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::EntryFields;

pub const MAX_CROP_TYPE_LEN: usize = 100;
pub const MAX_GROWTH_STAGE_LEN: usize = 50;
pub const MAX_OBSERVATIONS_LEN: usize = 2000;
pub const MAX_WEATHER_LEN: usize = 200;
pub const MAX_LOCATION_LEN: usize = 200;
pub const MAX_USER_NOTES_LEN: usize = 1000;
pub const MAX_ACTIONS: usize = 20;
pub const MAX_ACTION_LEN: usize = 100;
pub const MAX_PHOTOS: usize = 10;
pub const MAX_PHOTO_PATH_LEN: usize = 500;

/// Date format used for entry dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single field-level problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    Required {
        field: &'static str,
    },
    InvalidDate {
        value: String,
    },
    FutureDate {
        value: String,
    },
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    TooManyItems {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    ItemTooLong {
        field: &'static str,
        index: usize,
        max: usize,
        actual: usize,
    },
}

impl Violation {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::TooLong { field, .. }
            | Self::TooManyItems { field, .. }
            | Self::ItemTooLong { field, .. } => field,
            Self::InvalidDate { .. } | Self::FutureDate { .. } => "date",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required", field),
            Self::InvalidDate { value } => {
                write!(f, "date '{}' is not a valid YYYY-MM-DD date", value)
            }
            Self::FutureDate { value } => write!(f, "date '{}' is in the future", value),
            Self::TooLong { field, max, actual } => write!(
                f,
                "{} is too long ({} chars, max {})",
                field, actual, max
            ),
            Self::TooManyItems { field, max, actual } => write!(
                f,
                "{} has too many items ({}, max {})",
                field, actual, max
            ),
            Self::ItemTooLong {
                field,
                index,
                max,
                actual,
            } => write!(
                f,
                "{}[{}] is too long ({} chars, max {})",
                field, index, actual, max
            ),
        }
    }
}

/// Non-empty collection of violations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any violation concerns the named field
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field() == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Validate entry fields against `today`
///
/// Returns every violation found; an empty list means the fields are valid.
/// Required fields are checked first, and a blank required field is not
/// also reported as too long.
pub fn validate_entry(fields: &EntryFields, today: NaiveDate) -> Vec<Violation> {
    let mut violations = Vec::new();

    let crop_blank = fields.crop_type.trim().is_empty();
    let observations_blank = fields.observations.trim().is_empty();
    if crop_blank {
        violations.push(Violation::Required { field: "crop_type" });
    }
    if observations_blank {
        violations.push(Violation::Required {
            field: "observations",
        });
    }

    if let Err(violation) = resolve_date(fields.date.as_deref(), today) {
        violations.push(violation);
    }

    if !crop_blank {
        check_len(&mut violations, "crop_type", &fields.crop_type, MAX_CROP_TYPE_LEN);
    }
    check_len(
        &mut violations,
        "growth_stage",
        &fields.growth_stage,
        MAX_GROWTH_STAGE_LEN,
    );
    if !observations_blank {
        check_len(
            &mut violations,
            "observations",
            &fields.observations,
            MAX_OBSERVATIONS_LEN,
        );
    }
    check_optional_len(&mut violations, "weather", &fields.weather, MAX_WEATHER_LEN);
    check_optional_len(&mut violations, "location", &fields.location, MAX_LOCATION_LEN);
    check_optional_len(
        &mut violations,
        "user_notes",
        &fields.user_notes,
        MAX_USER_NOTES_LEN,
    );

    check_items(
        &mut violations,
        "actions_taken",
        &fields.actions_taken,
        MAX_ACTIONS,
        MAX_ACTION_LEN,
    );
    check_items(
        &mut violations,
        "photos",
        &fields.photos,
        MAX_PHOTOS,
        MAX_PHOTO_PATH_LEN,
    );

    violations
}

/// Validate and turn the violation list into a `Result`
pub fn ensure_valid(fields: &EntryFields, today: NaiveDate) -> Result<NaiveDate, ValidationErrors> {
    let violations = validate_entry(fields, today);
    if !violations.is_empty() {
        return Err(ValidationErrors::new(violations));
    }
    // Date already checked above, so this only picks the value
    resolve_date(fields.date.as_deref(), today).map_err(|v| ValidationErrors::new(vec![v]))
}

/// Parse an entry date; blank means `today`
pub fn resolve_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, Violation> {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(today),
    };

    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| Violation::InvalidDate {
        value: raw.to_string(),
    })?;

    if date > today {
        return Err(Violation::FutureDate {
            value: raw.to_string(),
        });
    }

    Ok(date)
}

fn check_len(violations: &mut Vec<Violation>, field: &'static str, value: &str, max: usize) {
    let actual = value.chars().count();
    if actual > max {
        violations.push(Violation::TooLong { field, max, actual });
    }
}

fn check_optional_len(
    violations: &mut Vec<Violation>,
    field: &'static str,
    value: &Option<String>,
    max: usize,
) {
    if let Some(value) = value {
        check_len(violations, field, value, max);
    }
}

fn check_items(
    violations: &mut Vec<Violation>,
    field: &'static str,
    items: &[String],
    max_items: usize,
    max_item_len: usize,
) {
    if items.len() > max_items {
        violations.push(Violation::TooManyItems {
            field,
            max: max_items,
            actual: items.len(),
        });
    }

    for (index, item) in items.iter().enumerate() {
        let actual = item.chars().count();
        if actual > max_item_len {
            violations.push(Violation::ItemTooLong {
                field,
                index,
                max: max_item_len,
                actual,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn valid_fields() -> EntryFields {
        let mut fields = EntryFields::new("Tomato", "Leaves yellowing at the base");
        fields.date = Some("2025-06-14".into());
        fields
    }

    #[test]
    fn test_valid_entry_has_no_violations() {
        assert!(validate_entry(&valid_fields(), today()).is_empty());
    }

    #[test]
    fn test_observations_too_long() {
        let mut fields = valid_fields();
        fields.observations = "a".repeat(MAX_OBSERVATIONS_LEN + 1);

        let violations = validate_entry(&fields, today());
        assert_eq!(
            violations,
            vec![Violation::TooLong {
                field: "observations",
                max: 2000,
                actual: 2001
            }]
        );
    }

    #[test]
    fn test_observations_at_limit_is_valid() {
        let mut fields = valid_fields();
        fields.observations = "é".repeat(MAX_OBSERVATIONS_LEN);
        assert!(validate_entry(&fields, today()).is_empty());
    }

    #[test]
    fn test_future_date_rejected() {
        let mut fields = valid_fields();
        fields.date = Some("2025-06-16".into());

        let violations = validate_entry(&fields, today());
        assert!(matches!(violations[0], Violation::FutureDate { .. }));
    }

    #[test]
    fn test_today_is_allowed() {
        let mut fields = valid_fields();
        fields.date = Some("2025-06-15".into());
        assert!(validate_entry(&fields, today()).is_empty());
    }

    #[test]
    fn test_invalid_calendar_date() {
        let mut fields = valid_fields();
        fields.date = Some("2025-02-30".into());
        let violations = validate_entry(&fields, today());
        assert_eq!(
            violations,
            vec![Violation::InvalidDate {
                value: "2025-02-30".into()
            }]
        );

        fields.date = Some("15/06/2025".into());
        assert!(matches!(
            validate_entry(&fields, today())[0],
            Violation::InvalidDate { .. }
        ));
    }

    #[test]
    fn test_blank_date_defaults_to_today() {
        assert_eq!(resolve_date(None, today()), Ok(today()));
        assert_eq!(resolve_date(Some("  "), today()), Ok(today()));
    }

    #[test]
    fn test_missing_crop_type_is_required_violation() {
        let mut fields = valid_fields();
        fields.crop_type = "   ".into();

        let violations = validate_entry(&fields, today());
        assert_eq!(violations, vec![Violation::Required { field: "crop_type" }]);
    }

    #[test]
    fn test_missing_both_required_fields_reports_both() {
        let fields = EntryFields::default();
        let violations = validate_entry(&fields, today());

        assert_eq!(
            violations,
            vec![
                Violation::Required { field: "crop_type" },
                Violation::Required {
                    field: "observations"
                },
            ]
        );
    }

    #[test]
    fn test_all_violations_collected() {
        let mut fields = EntryFields::default();
        fields.date = Some("2999-01-01".into());
        fields.growth_stage = "s".repeat(51);
        fields.weather = Some("w".repeat(201));
        fields.location = Some("l".repeat(201));
        fields.user_notes = Some("n".repeat(1001));

        let errors = ValidationErrors::new(validate_entry(&fields, today()));
        assert_eq!(errors.len(), 7);
        for field in [
            "crop_type",
            "observations",
            "date",
            "growth_stage",
            "weather",
            "location",
            "user_notes",
        ] {
            assert!(errors.has_field(field), "missing violation for {}", field);
        }
    }

    #[test]
    fn test_list_limits() {
        let mut fields = valid_fields();
        fields.actions_taken = vec!["water".to_string(); MAX_ACTIONS + 1];
        fields.photos = vec!["p".repeat(MAX_PHOTO_PATH_LEN + 1)];

        let violations = validate_entry(&fields, today());
        assert!(violations.contains(&Violation::TooManyItems {
            field: "actions_taken",
            max: 20,
            actual: 21
        }));
        assert!(violations.contains(&Violation::ItemTooLong {
            field: "photos",
            index: 0,
            max: 500,
            actual: 501
        }));
    }

    #[test]
    fn test_ensure_valid_returns_date() {
        assert_eq!(
            ensure_valid(&valid_fields(), today()),
            Ok(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap())
        );
        assert!(ensure_valid(&EntryFields::default(), today()).is_err());
    }

    #[test]
    fn test_violation_display() {
        let v = Violation::TooLong {
            field: "weather",
            max: 200,
            actual: 250,
        };
        assert_eq!(v.to_string(), "weather is too long (250 chars, max 200)");
    }
}
