//! Unit tests for the field codec

use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use ussd_session_exporter::{codec, response_offset, Cost, SessionStatus};

#[test]
fn test_decode_date_locale_pattern() {
    let date = codec::decode_date("May 30, 2021 2:15:07 PM").unwrap();
    assert_eq!((date.year(), date.month(), date.day()), (2021, 5, 30));
    assert_eq!((date.hour(), date.minute(), date.second()), (14, 15, 7));
    assert_eq!(date.offset(), &response_offset());
}

#[test]
fn test_decode_date_morning_hours() {
    let date = codec::decode_date("Jan 02, 2022 12:00:01 AM").unwrap();
    assert_eq!((date.hour(), date.minute(), date.second()), (0, 0, 1));
}

#[test]
fn test_decode_date_rejects_other_formats() {
    assert!(codec::decode_date("2021-05-30T14:15:07Z").is_err());
    assert!(codec::decode_date("30/05/2021 14:15").is_err());
    assert!(codec::decode_date("").is_err());
}

#[test]
fn test_encode_date_canonical_instant() {
    let date = codec::decode_date("May 30, 2021 2:15:07 PM").unwrap();
    assert_eq!(codec::encode_date(&date), "2021-05-30T14:15:07+01:00");
}

#[test]
fn test_duration_round_trip() {
    let duration = codec::decode_duration("90s").unwrap();
    assert_eq!(duration, Duration::from_secs(90));
    assert_eq!(codec::encode_duration(&duration), "90s");

    let zero = codec::decode_duration("0s").unwrap();
    assert_eq!(codec::decode_duration(&codec::encode_duration(&zero)).unwrap(), zero);
}

#[test]
fn test_duration_requires_seconds_suffix() {
    assert!(codec::decode_duration("90").is_err());
    assert!(codec::decode_duration("s").is_err());
    assert!(codec::decode_duration("1.5s").is_err());
    assert!(codec::decode_duration("90m").is_err());
}

#[test]
fn test_cost_sentinel_decodes_to_no_currency() {
    let cost = codec::decode_cost("None").unwrap();
    assert_eq!(cost.currency, "XXX");
    assert_eq!(cost.amount, Decimal::ZERO);
    assert!(cost.is_none());
}

#[test]
fn test_cost_decodes_exact_decimal() {
    let cost = codec::decode_cost("KES 123.45").unwrap();
    assert_eq!(cost.currency, "KES");
    // Exact decimal comparison, no float rounding anywhere
    assert_eq!(cost.amount, Decimal::from_str("123.45").unwrap());
}

#[test]
fn test_cost_splits_on_first_whitespace_run() {
    let cost = codec::decode_cost("NGN   0.50").unwrap();
    assert_eq!(cost.currency, "NGN");
    assert_eq!(cost.amount, Decimal::from_str("0.50").unwrap());
}

#[test]
fn test_cost_rejects_malformed_text() {
    assert!(codec::decode_cost("KES").is_err());
    assert!(codec::decode_cost("KES abc").is_err());
}

#[test]
fn test_cost_round_trip_preserves_scale() {
    let cost = codec::decode_cost("KES 5.00").unwrap();
    assert_eq!(codec::encode_cost(&cost), "KES 5.00");
    assert_eq!(codec::decode_cost(&codec::encode_cost(&cost)).unwrap(), cost);
}

#[test]
fn test_cost_sentinel_encodes_as_no_currency_zero() {
    let encoded = codec::encode_cost(&Cost::none());
    assert_eq!(encoded, "XXX 0");
    assert_eq!(codec::decode_cost(&encoded).unwrap(), Cost::none());
}

#[test]
fn test_status_round_trips_verbatim() {
    for tag in ["Completed", "Failed", "Timed Out", "SOMETHING_NEW"] {
        let status = codec::decode_status(tag);
        assert_eq!(codec::encode_status(&status), tag);
        assert_eq!(status, SessionStatus::new(tag));
    }
}

#[test]
fn test_input_sentinel_and_verbatim_text() {
    assert_eq!(codec::decode_input("N/A"), None);
    assert_eq!(codec::decode_input(""), Some(String::new()));
    assert_eq!(codec::decode_input("1*2*3"), Some("1*2*3".to_string()));
}

#[test]
fn test_input_absent_encodes_to_empty_not_sentinel() {
    // The destination format uses the empty string for absent input, so
    // absent does not survive a response-side re-decode: it comes back as
    // present empty text.
    let encoded = codec::encode_input(&None);
    assert_eq!(encoded, "");
    assert_eq!(codec::decode_input(&encoded), Some(String::new()));
}

#[test]
fn test_hops_decoding() {
    assert_eq!(codec::decode_hops("0").unwrap(), 0);
    assert_eq!(codec::decode_hops("17").unwrap(), 17);
    assert!(codec::decode_hops("-1").is_err());
    assert!(codec::decode_hops("three").is_err());
}

#[test]
fn test_decode_row_full_record() {
    let record = csv::StringRecord::from(vec![
        "May 30, 2021 2:15:07 PM",
        "sess-1",
        "*384*7#",
        "+254700000001",
        "2",
        "15s",
        "KES 1.50",
        "Completed",
        "N/A",
    ]);
    let session = codec::decode_row(&record).unwrap();

    assert_eq!(session.session_id, "sess-1");
    assert_eq!(session.service_code, "*384*7#");
    assert_eq!(session.phone_number, "+254700000001");
    assert_eq!(session.hops, 2);
    assert_eq!(session.duration, Duration::from_secs(15));
    assert_eq!(session.cost.currency, "KES");
    assert_eq!(session.status, SessionStatus::new("Completed"));
    assert_eq!(session.input, None);
}

#[test]
fn test_decode_row_rejects_short_record() {
    let record = csv::StringRecord::from(vec!["May 30, 2021 2:15:07 PM", "sess-1"]);
    assert!(matches!(
        codec::decode_row(&record),
        Err(codec::FormatError::RowLength { expected: 9, actual: 2 })
    ));
}

#[test]
fn test_encode_row_column_order() {
    let record = csv::StringRecord::from(vec![
        "Jun 01, 2021 9:05:11 AM",
        "sess-2",
        "*100#",
        "+254700000002",
        "3",
        "42s",
        "None",
        "Failed",
        "7",
    ]);
    let session = codec::decode_row(&record).unwrap();
    let row = codec::encode_row(&session);

    assert_eq!(
        row,
        [
            "2021-06-01T09:05:11+01:00",
            "sess-2",
            "*100#",
            "+254700000002",
            "3",
            "42s",
            "XXX 0",
            "Failed",
            "7",
        ]
        .map(str::to_string)
    );
}

#[test]
fn test_encoded_row_redecodes_identically_except_date_and_absence() {
    // Response-side round trip: every field that is symmetric must survive
    // encode-then-decode exactly. Date (locale text vs instant) and absent
    // input (N/A vs empty) are the two deliberate asymmetries.
    let record = csv::StringRecord::from(vec![
        "Jun 01, 2021 9:05:11 AM",
        "sess-2",
        "*100#",
        "+254700000002",
        "3",
        "42s",
        "KES 12.00",
        "Completed",
        "1*4*2",
    ]);
    let session = codec::decode_row(&record).unwrap();
    let row = codec::encode_row(&session);

    assert_eq!(codec::decode_hops(&row[4]).unwrap(), session.hops);
    assert_eq!(codec::decode_duration(&row[5]).unwrap(), session.duration);
    assert_eq!(codec::decode_cost(&row[6]).unwrap(), session.cost);
    assert_eq!(codec::decode_status(&row[7]), session.status);
    assert_eq!(codec::decode_input(&row[8]), session.input);
}
