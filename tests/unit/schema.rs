//! Unit tests for export header validation

use ussd_session_exporter::schema::{validate_header, COLUMNS};

#[test]
fn test_expected_header_passes() {
    let header = [
        "Date",
        "SessionId",
        "ServiceCode",
        "PhoneNumber",
        "Hops",
        "Duration",
        "Cost",
        "Status",
        "Input",
    ];
    assert!(validate_header(header).is_ok());
}

#[test]
fn test_header_order_is_not_significant_for_validation() {
    let mut shuffled = COLUMNS.to_vec();
    shuffled.rotate_left(3);
    assert!(validate_header(shuffled).is_ok());
}

#[test]
fn test_provider_whitespace_variants_pass() {
    let header = [
        " Date",
        "Session Id",
        "Service Code",
        "Phone Number",
        "Hops",
        "Duration ",
        "Cost",
        "Status",
        "In put",
    ];
    assert!(validate_header(header).is_ok());
}

#[test]
fn test_missing_column_fails_with_expected_only() {
    let header = [
        "Date",
        "SessionId",
        "ServiceCode",
        "PhoneNumber",
        "Hops",
        "Duration",
        "Cost",
        "Status",
    ];
    let err = validate_header(header).unwrap_err();

    assert_eq!(err.expected_only.len(), 1);
    assert!(err.expected_only.contains("Input"));
    assert!(err.actual_only.is_empty());
    assert_eq!(err.common.len(), 8);
    assert!(err.common.contains("Date"));
}

#[test]
fn test_unknown_column_fails_with_actual_only() {
    let mut header = COLUMNS.to_vec();
    header.push("Operator");
    let err = validate_header(header).unwrap_err();

    assert!(err.expected_only.is_empty());
    assert_eq!(err.actual_only.len(), 1);
    assert!(err.actual_only.contains("Operator"));
    assert_eq!(err.common.len(), COLUMNS.len());
}

#[test]
fn test_renamed_column_reports_both_sides() {
    let header = [
        "Date",
        "SessionUuid",
        "ServiceCode",
        "PhoneNumber",
        "Hops",
        "Duration",
        "Cost",
        "Status",
        "Input",
    ];
    let err = validate_header(header).unwrap_err();

    assert!(err.expected_only.contains("SessionId"));
    assert!(err.actual_only.contains("SessionUuid"));
    assert_eq!(err.common.len(), 8);
}
