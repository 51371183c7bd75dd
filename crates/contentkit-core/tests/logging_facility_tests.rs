#![allow(clippy::unwrap_used, clippy::expect_used)]

use contentkit_core::errors::{ContentError, ExError, ExErrorKind};
use contentkit_core::logging_facility::test_capture::init_test_capture;
use contentkit_core::logging_facility::Profile;
use contentkit_core::{log_op_end, log_op_error, log_op_start};
use contentkit_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_CONTENT_ID, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_ERR_KIND,
};

#[test]
fn test_start_and_end_share_op() {
    let capture = init_test_capture();
    let op = "logging_start_end_unique_1";

    log_op_start!(op, content_id = "page-home");
    log_op_end!(op, duration_ms = 7);

    capture.assert_event_exists(op, EVENT_START);
    capture.assert_event_exists(op, EVENT_END);
    let events = capture.events_for_op(op);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].field(FIELD_CONTENT_ID), Some("page-home"));
    assert_eq!(events[1].field(FIELD_DURATION_MS), Some("7"));
}

#[test]
fn test_error_event_carries_code() {
    let capture = init_test_capture();
    let op = "logging_error_unique_2";

    let err = ContentError::MigrationPathNotFound {
        from: "1.0.0".into(),
        to: "2.0.0".into(),
        missing: "2.0.0".into(),
    };
    log_op_error!(op, err, duration_ms = 1);

    let events = capture.events_for_op(op);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("ERR_MIGRATION_PATH_NOT_FOUND"));
    assert_eq!(events[0].field(FIELD_ERR_KIND), Some("MigrationPathNotFound"));
}

#[test]
fn test_error_event_accepts_ex_error() {
    let capture = init_test_capture();
    let op = "logging_ex_error_unique_3";

    let err = ExError::new(ExErrorKind::Conflict).with_content_id("page-about");
    log_op_error!(op, err, duration_ms = 2, content_id = "page-about");

    let count = capture.count_events(|e| {
        e.op.as_deref() == Some(op) && e.field("err.code") == Some("ERR_CONFLICT")
    });
    assert_eq!(count, 1);
}

#[test]
fn test_profile_parsing() {
    assert_eq!("dev".parse::<Profile>().unwrap(), Profile::Development);
    assert_eq!("production".parse::<Profile>().unwrap(), Profile::Production);
    assert_eq!("test".parse::<Profile>().unwrap(), Profile::Test);
    assert!("loud".parse::<Profile>().is_err());
}
