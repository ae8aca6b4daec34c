//! Field codec for the provider's textual encodings
//!
//! Pure, stateless conversion between the export endpoint's field texts and
//! the typed [`Session`] representation. Decoding accepts the provider's
//! response-side formats; encoding produces the normalized output formats,
//! which are deliberately not identical (the provider emits locale-style
//! timestamps but the export file carries canonical instants, and an absent
//! input encodes as the empty string rather than the provider's `N/A`).
//!
//! A field that does not match its expected encoding fails the whole page:
//! a parsing discrepancy usually means the provider changed its format, and
//! silently skipping rows would hide that.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

use crate::schema::COLUMNS;
use crate::{response_offset, Cost, Session, SessionStatus};

/// Pattern the provider uses for timestamps in export responses,
/// e.g. `May 30, 2021 2:15:07 PM`.
const RESPONSE_DATE_FORMAT: &str = "%b %d, %Y %I:%M:%S %p";

/// Text the provider reports for a session with no cost.
const COST_SENTINEL: &str = "None";

/// Text the provider reports for a session with no subscriber input.
const INPUT_SENTINEL: &str = "N/A";

/// Field decoding errors
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Timestamp text did not match the provider's response pattern
    #[error("invalid date '{0}': expected e.g. 'May 30, 2021 2:15:07 PM'")]
    InvalidDate(String),

    /// Duration text was not of the form `<seconds>s`
    #[error("invalid duration '{0}': expected '<seconds>s'")]
    InvalidDuration(String),

    /// Cost text was neither the sentinel nor `<currency> <amount>`
    #[error("invalid cost '{0}': expected 'None' or '<currency> <amount>'")]
    InvalidCost(String),

    /// Hop count text was not a non-negative integer
    #[error("invalid hop count '{0}': expected a non-negative integer")]
    InvalidHops(String),

    /// Row did not carry one field per schema column
    #[error("row has {actual} fields, expected {expected}")]
    RowLength {
        /// Number of columns the schema defines
        expected: usize,
        /// Number of fields the row actually carried
        actual: usize,
    },
}

/// Decode a provider timestamp, anchoring it to the response timezone.
///
/// # Errors
/// Returns [`FormatError::InvalidDate`] if the text does not match the
/// provider's locale-style pattern.
pub fn decode_date(text: &str) -> Result<DateTime<FixedOffset>, FormatError> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), RESPONSE_DATE_FORMAT)
        .map_err(|_| FormatError::InvalidDate(text.to_string()))?;
    naive
        .and_local_timezone(response_offset())
        .single()
        .ok_or_else(|| FormatError::InvalidDate(text.to_string()))
}

/// Encode a timestamp as a canonical RFC 3339 instant.
///
/// Encoding is intentionally asymmetric with [`decode_date`]: the provider
/// emits locale-style timestamps, but the export file carries instants.
pub fn encode_date(date: &DateTime<FixedOffset>) -> String {
    date.to_rfc3339()
}

/// Decode a seconds-suffixed duration such as `90s`.
///
/// # Errors
/// Returns [`FormatError::InvalidDuration`] if the trailing `s` is absent or
/// the prefix is not an integer.
pub fn decode_duration(text: &str) -> Result<Duration, FormatError> {
    let seconds = text
        .trim()
        .strip_suffix('s')
        .ok_or_else(|| FormatError::InvalidDuration(text.to_string()))?
        .parse::<u64>()
        .map_err(|_| FormatError::InvalidDuration(text.to_string()))?;
    Ok(Duration::from_secs(seconds))
}

/// Encode a duration back to the normalized `<seconds>s` form.
pub fn encode_duration(duration: &Duration) -> String {
    format!("{}s", duration.as_secs())
}

/// Decode a cost: the `None` sentinel, or a currency code and an exact
/// decimal amount separated by the first run of whitespace.
///
/// # Errors
/// Returns [`FormatError::InvalidCost`] if the text is neither the sentinel
/// nor a `<currency> <amount>` pair with a parseable decimal amount.
pub fn decode_cost(text: &str) -> Result<Cost, FormatError> {
    let text = text.trim();
    if text == COST_SENTINEL {
        return Ok(Cost::none());
    }

    let (currency, amount_text) = text
        .split_once(char::is_whitespace)
        .ok_or_else(|| FormatError::InvalidCost(text.to_string()))?;
    let amount = Decimal::from_str(amount_text.trim_start())
        .map_err(|_| FormatError::InvalidCost(text.to_string()))?;

    Ok(Cost {
        currency: currency.to_string(),
        amount,
    })
}

/// Encode a cost as `<currency> <amount>`.
///
/// The sentinel encodes as `XXX 0`, which decodes back to the same value.
pub fn encode_cost(cost: &Cost) -> String {
    format!("{} {}", cost.currency, cost.amount)
}

/// Decode a status tag verbatim.
pub fn decode_status(text: &str) -> SessionStatus {
    SessionStatus::new(text)
}

/// Encode a status tag verbatim.
pub fn encode_status(status: &SessionStatus) -> String {
    status.as_str().to_string()
}

/// Decode subscriber input, mapping the `N/A` sentinel to absence.
///
/// Any other text, including the empty string, is present input verbatim.
pub fn decode_input(text: &str) -> Option<String> {
    if text == INPUT_SENTINEL {
        None
    } else {
        Some(text.to_string())
    }
}

/// Encode subscriber input; absence becomes the empty string, never `N/A`.
///
/// The destination format uses the empty string for absent input, so this
/// asymmetry with [`decode_input`] is load-bearing.
pub fn encode_input(input: &Option<String>) -> String {
    input.clone().unwrap_or_default()
}

/// Decode a hop count.
///
/// # Errors
/// Returns [`FormatError::InvalidHops`] on non-numeric text.
pub fn decode_hops(text: &str) -> Result<u32, FormatError> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| FormatError::InvalidHops(text.to_string()))
}

/// Encode a hop count.
pub fn encode_hops(hops: u32) -> String {
    hops.to_string()
}

/// Decode one export CSV row into a [`Session`].
///
/// Fields are taken positionally in [`COLUMNS`] order.
///
/// # Errors
/// Returns the first field's [`FormatError`], or [`FormatError::RowLength`]
/// if the row does not carry exactly one field per column.
pub fn decode_row(record: &csv::StringRecord) -> Result<Session, FormatError> {
    if record.len() != COLUMNS.len() {
        return Err(FormatError::RowLength {
            expected: COLUMNS.len(),
            actual: record.len(),
        });
    }

    Ok(Session {
        date: decode_date(&record[0])?,
        session_id: record[1].to_string(),
        service_code: record[2].to_string(),
        phone_number: record[3].to_string(),
        hops: decode_hops(&record[4])?,
        duration: decode_duration(&record[5])?,
        cost: decode_cost(&record[6])?,
        status: decode_status(&record[7]),
        input: decode_input(&record[8]),
    })
}

/// Encode a [`Session`] as one output row in [`COLUMNS`] order.
pub fn encode_row(session: &Session) -> [String; 9] {
    [
        encode_date(&session.date),
        session.session_id.clone(),
        session.service_code.clone(),
        session.phone_number.clone(),
        encode_hops(session.hops),
        encode_duration(&session.duration),
        encode_cost(&session.cost),
        encode_status(&session.status),
        encode_input(&session.input),
    ]
}
