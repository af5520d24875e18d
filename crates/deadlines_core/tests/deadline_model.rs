use chrono::NaiveDate;
use deadlines_core::{Deadline, DeadlineValidationError};
use uuid::Uuid;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
}

#[test]
fn with_id_trims_name_and_keeps_identity() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let deadline = Deadline::with_id(id, "  Thesis draft  ", date()).unwrap();

    assert_eq!(deadline.id, id);
    assert_eq!(deadline.name, "Thesis draft");
    assert_eq!(deadline.date, date());
}

#[test]
fn with_id_rejects_nil_id_and_blank_name() {
    assert_eq!(
        Deadline::with_id(Uuid::nil(), "ok", date()).unwrap_err(),
        DeadlineValidationError::NilId
    );
    assert_eq!(
        Deadline::with_id(Uuid::new_v4(), "", date()).unwrap_err(),
        DeadlineValidationError::EmptyName
    );
}

#[test]
fn serialization_uses_id_name_and_plain_date() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let deadline = Deadline::with_id(id, "Release", date()).unwrap();

    let json = serde_json::to_value(&deadline).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "11111111-2222-4333-8444-555555555555",
            "name": "Release",
            "date": "2025-08-01"
        })
    );

    let decoded: Deadline = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, deadline);
}

#[test]
fn deserialize_accepts_blank_name_from_older_saves() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "",
        "date": "2025-08-01"
    });

    let decoded = serde_json::from_value::<Deadline>(value).unwrap();
    assert_eq!(decoded.name, "");
    assert_eq!(
        decoded.validate().unwrap_err(),
        DeadlineValidationError::EmptyName
    );
}

#[test]
fn deserialize_rejects_date_with_time_component() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "Timestamp",
        "date": "2025-08-01T12:00:00Z"
    });
    assert!(serde_json::from_value::<Deadline>(value).is_err());
}
