#![allow(clippy::unwrap_used, clippy::expect_used)]

use snaptab_core::errors::SnapTabError;
use snaptab_core::logging_facility::test_capture::init_test_capture;
use snaptab_core::{log_op_end, log_op_error, log_op_start};
use snaptab_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, namespaces = 2);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event(), Some(EVENT_START));
    assert_eq!(events[0].field("namespaces"), Some("2"));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event(), Some(EVENT_END));
    assert_eq!(events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = SnapTabError::MissingKeyValue {
        table: "country".to_string(),
        field: "country_id".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let events = capture.events_for_op(op_name);
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("ERR_MISSING_KEY_VALUE"));
}

#[test]
fn test_single_start_end_pair() {
    let capture = init_test_capture();
    let op_name = "test_boundary_unique_4";

    log_op_start!(op_name, table = "country");
    log_op_end!(op_name, duration_ms = 1, rows = 3);

    assert_eq!(capture.count(op_name, EVENT_START), 1);
    assert_eq!(capture.count(op_name, EVENT_END), 1);
}
