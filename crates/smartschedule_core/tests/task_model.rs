use chrono::NaiveDate;
use smartschedule_core::{parse_duration, Task, TaskValidationError};

fn may_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

#[test]
fn task_new_trims_and_generates_id() {
    let task = Task::new("  Write report ", " Work ", 2.0, may_first()).unwrap();

    assert!(!task.id.is_empty());
    assert_eq!(task.name, "Write report");
    assert_eq!(task.category, "Work");
    assert_eq!(task.duration, 2.0);
    assert_eq!(task.date, may_first());
}

#[test]
fn task_new_rejects_empty_name_and_bad_durations() {
    assert_eq!(
        Task::new("   ", "Work", 2.0, may_first()).unwrap_err(),
        TaskValidationError::EmptyName
    );
    for duration in [0.0, -1.0, f64::INFINITY] {
        assert_eq!(
            Task::new("X", "", duration, may_first()).unwrap_err(),
            TaskValidationError::InvalidDuration(duration)
        );
    }
    assert!(matches!(
        Task::new("X", "", f64::NAN, may_first()).unwrap_err(),
        TaskValidationError::InvalidDuration(value) if value.is_nan()
    ));
}

#[test]
fn with_id_rejects_blank_id() {
    let err = Task::with_id(" ", "X", "", 1.0, may_first()).unwrap_err();
    assert_eq!(err, TaskValidationError::EmptyId);
}

#[test]
fn task_serialization_uses_expected_wire_fields() {
    let task = Task::with_id("t-1", "Gym", "Health", 1.5, may_first()).unwrap();

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "t-1",
            "name": "Gym",
            "category": "Health",
            "duration": 1.5,
            "date": "2024-05-01"
        })
    );

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn parse_duration_reads_form_text() {
    assert_eq!(parse_duration(" 1.25 ").unwrap(), 1.25);
    assert_eq!(
        parse_duration("abc").unwrap_err(),
        TaskValidationError::UnparseableDuration("abc".to_string())
    );
    assert_eq!(
        parse_duration("").unwrap_err(),
        TaskValidationError::InvalidDuration(0.0)
    );
    assert_eq!(
        parse_duration("-2").unwrap_err(),
        TaskValidationError::InvalidDuration(-2.0)
    );
}
