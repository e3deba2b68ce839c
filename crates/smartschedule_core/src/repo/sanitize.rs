//! Tolerant coercion of untrusted persisted task records.
//!
//! # Responsibility
//! - Turn one loosely-typed JSON element into a valid `Task`, or discard it.
//!
//! # Invariants
//! - Never panics and never errors; a bad record yields `None`.
//! - Checks run in a fixed order: shape, name, category, duration, date, id.

use crate::model::date::parse_day;
use crate::model::task::{new_task_id, validate_duration, Task};
use chrono::NaiveDate;
use serde_json::Value;

/// Sanitizes one persisted record.
///
/// - Non-object values are discarded.
/// - `name` is coerced to trimmed text; empty or missing discards the record.
/// - `category` is coerced to trimmed text, defaulting to empty.
/// - `duration` is coerced to a number (numeric strings allowed); non-finite
///   or `<= 0` discards the record.
/// - `date` falls back to `today` when missing or malformed.
/// - `id` is generated when missing or blank.
pub fn sanitize_task(raw: &Value, today: NaiveDate) -> Option<Task> {
    let record = raw.as_object()?;

    let name = record.get("name").and_then(coerce_text)?;
    if name.is_empty() {
        return None;
    }

    let category = record
        .get("category")
        .and_then(coerce_text)
        .unwrap_or_default();

    let duration = record.get("duration").and_then(coerce_number)?;
    let duration = validate_duration(duration).ok()?;

    let date = record
        .get("date")
        .and_then(Value::as_str)
        .and_then(parse_day)
        .unwrap_or(today);

    let id = record
        .get("id")
        .and_then(coerce_text)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(new_task_id);

    Task::with_id(id, &name, &category, duration, date).ok()
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_task;
    use chrono::NaiveDate;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn keeps_valid_record_verbatim() {
        let raw = json!({
            "id": "t-1",
            "name": "Write report",
            "category": "Work",
            "duration": 2,
            "date": "2024-04-30"
        });
        let task = sanitize_task(&raw, today()).unwrap();
        assert_eq!(task.id, "t-1");
        assert_eq!(task.name, "Write report");
        assert_eq!(task.category, "Work");
        assert_eq!(task.duration, 2.0);
        assert_eq!(task.date, NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
    }

    #[test]
    fn trims_text_and_coerces_numeric_strings() {
        let raw = json!({ "name": "  Gym ", "category": " Health ", "duration": " 1.5 " });
        let task = sanitize_task(&raw, today()).unwrap();
        assert_eq!(task.name, "Gym");
        assert_eq!(task.category, "Health");
        assert_eq!(task.duration, 1.5);
    }

    #[test]
    fn missing_or_malformed_date_defaults_to_today() {
        let missing = json!({ "name": "A", "duration": 1 });
        let malformed = json!({ "name": "B", "duration": 1, "date": "not a day" });
        let wrong_type = json!({ "name": "C", "duration": 1, "date": 20240501 });
        for raw in [missing, malformed, wrong_type] {
            assert_eq!(sanitize_task(&raw, today()).unwrap().date, today());
        }
    }

    #[test]
    fn non_string_category_becomes_empty() {
        let raw = json!({ "name": "A", "duration": 1, "category": ["x"] });
        assert_eq!(sanitize_task(&raw, today()).unwrap().category, "");
    }

    #[test]
    fn rejects_bad_shapes_names_and_durations() {
        let rejected = [
            json!("just a string"),
            json!(null),
            json!([1, 2]),
            json!({ "duration": 1 }),
            json!({ "name": "   ", "duration": 1 }),
            json!({ "name": { "first": "x" }, "duration": 1 }),
            json!({ "name": "X", "duration": "abc" }),
            json!({ "name": "X", "duration": 0 }),
            json!({ "name": "X", "duration": -2 }),
            json!({ "name": "X", "duration": "" }),
            json!({ "name": "X", "duration": null }),
            json!({ "name": "X" }),
            json!({ "name": "X", "duration": "Infinity" }),
        ];
        for raw in rejected {
            assert!(sanitize_task(&raw, today()).is_none(), "accepted {raw}");
        }
    }

    #[test]
    fn missing_or_blank_id_is_generated() {
        let first = sanitize_task(&json!({ "name": "A", "duration": 1 }), today()).unwrap();
        let second =
            sanitize_task(&json!({ "id": " ", "name": "B", "duration": 1 }), today()).unwrap();
        assert!(!first.id.is_empty());
        assert!(!second.id.is_empty());
        assert_ne!(first.id, second.id);
    }
}
