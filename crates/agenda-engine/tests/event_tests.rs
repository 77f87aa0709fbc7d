//! Tests for event rows as handed over by the storage layer.

use agenda_engine::{Event, Occurrence, RecurrenceCategory};
use chrono::{Duration, TimeZone, Utc};

#[test]
fn minimal_row_deserializes_with_defaults() {
    let event: Event = serde_json::from_str(r#"{"id": "e1", "title": "Lunch"}"#).unwrap();
    assert_eq!(event.id.0, "e1");
    assert_eq!(event.start, None);
    assert!(!event.all_day);
    assert_eq!(event.recurrence_category, RecurrenceCategory::None);
    assert!(event.tags.is_empty());
}

#[test]
fn full_row_deserializes_camel_case() {
    let json = r#"{
        "id": "e2",
        "title": "Quarterly review",
        "start": "2024-01-15T10:00:00Z",
        "end": "2024-01-15T11:30:00Z",
        "allDay": false,
        "recurrenceCategory": "quarterly",
        "recurrenceRule": "FREQ=MONTHLY;INTERVAL=3",
        "platformId": 3,
        "tags": ["finance", "review"],
        "alertMinutes": 30,
        "emailAlertWorkingDays": 2
    }"#;
    let event: Event = serde_json::from_str(json).unwrap();
    assert!(event.is_recurring());
    assert_eq!(event.recurrence_category, RecurrenceCategory::Quarterly);
    assert_eq!(event.platform_id, Some(3));
    assert_eq!(event.duration(), Duration::minutes(90));
    assert_eq!(event.email_alert_working_days, Some(2));
}

#[test]
fn duration_is_zero_without_both_bounds_or_when_inverted() {
    let mut event = Event::new("e1", "x");
    assert_eq!(event.duration(), Duration::zero());

    event.start = Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
    assert_eq!(event.duration(), Duration::zero());

    event.end = Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
    assert_eq!(event.duration(), Duration::zero());
}

#[test]
fn occurrence_serializes_instance_fields() {
    let mut event = Event::new("e1", "Standup");
    let start = Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap();
    event.start = Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
    event.end = Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 15, 0).unwrap());

    let value = serde_json::to_value(Occurrence::instance(&event, start)).unwrap();
    assert_eq!(value["id"], "e1");
    assert_eq!(value["occurrenceStart"], "2024-01-08T09:00:00Z");
    assert_eq!(value["occurrenceEnd"], "2024-01-08T09:15:00Z");
    assert_eq!(value["instanceKey"], "2024-01-08T09:00:00Z");
    assert_eq!(value["recurrenceCategory"], "none");
}
