//! # USSD Session Exporter Library
//!
//! A library for retrieving a telecom provider's complete USSD session history
//! through its paginated dashboard export endpoint and materializing it as a
//! de-duplicated, chronologically consistent CSV file.
//!
//! ## The hard part
//!
//! The export endpoint returns at most [`fetcher::PAGE_CAPACITY`] records per
//! requested date range and, when a range holds more, silently drops the
//! *older* records. There is no cursor and no "has more" signal. The
//! [`fetcher::pagination::SessionHistory`] engine walks backward through time
//! in one-month windows, detects when a window was truncated, and narrows to
//! the truncated day so that no record is emitted twice and none is lost
//! (except on a single day whose own volume exceeds the page capacity, which
//! is a documented provider limitation).
//!
//! ## Quick Start
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use ussd_session_exporter::fetcher::auth;
//! use ussd_session_exporter::fetcher::http::HttpPageFetcher;
//! use ussd_session_exporter::fetcher::pagination::SessionHistory;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = reqwest::Client::new();
//! let token = auth::sign_in(&client, "https://api.example.com", "me@example.com", "secret").await?;
//! let fetcher = HttpPageFetcher::new(client, "https://api.example.com", "nest.account.dashboard", token);
//!
//! let mut sessions = SessionHistory::from_today(fetcher).into_stream();
//! while let Some(session) = sessions.next().await {
//!     println!("{}", session?.session_id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`codec`] - Bidirectional field codec for the provider's textual encodings
//! - [`schema`] - The fixed export column set and header validation
//! - [`fetcher`] - Sign-in, the export HTTP client, and the pagination engine
//! - [`output`] - Export output writers (CSV)
//! - [`config`] - Credentials from the process environment
//! - [`cli`] - CLI command implementations

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use std::time::Duration;

/// CLI command implementations
pub mod cli;

/// Field codec for the provider's textual encodings
pub mod codec;

/// Credentials from the process environment
pub mod config;

/// Sign-in, export HTTP client, and the backward pagination engine
pub mod fetcher;

/// Export output writers
pub mod output;

/// Export column schema and header validation
pub mod schema;

/// Currency code the provider's "no cost" sentinel maps to (ISO 4217 "no currency").
pub const NO_CURRENCY: &str = "XXX";

/// Minutes east of UTC for request-side calendar dates (window bounds, the
/// engine's cursor arithmetic, and the default end date). Matches the
/// `timeOffset` the dashboard sends at sign-in.
pub const REQUEST_UTC_OFFSET_MINUTES: i32 = 60;

/// Minutes east of UTC the provider stamps on timestamps in export responses.
/// Coincides with [`REQUEST_UTC_OFFSET_MINUTES`] today, but the two sides of
/// the protocol are independent and are modeled as distinct values.
pub const RESPONSE_UTC_OFFSET_MINUTES: i32 = 60;

/// Timezone for request-side calendar dates.
pub fn request_offset() -> FixedOffset {
    // SAFETY: unwrap() is safe because the offset constant is well inside +/-24h
    FixedOffset::east_opt(REQUEST_UTC_OFFSET_MINUTES * 60).unwrap()
}

/// Timezone that decoded response timestamps are anchored to.
pub fn response_offset() -> FixedOffset {
    // SAFETY: unwrap() is safe because the offset constant is well inside +/-24h
    FixedOffset::east_opt(RESPONSE_UTC_OFFSET_MINUTES * 60).unwrap()
}

/// Currency-tagged monetary amount.
///
/// Amounts are exact decimals, never binary floating point, so re-serialized
/// costs match the provider's text digit for digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cost {
    /// ISO 4217 currency code, or [`NO_CURRENCY`] for the "no cost" sentinel
    pub currency: String,
    /// Exact decimal amount
    pub amount: Decimal,
}

impl Cost {
    /// The "no cost" sentinel the provider reports as `None`: currency
    /// [`NO_CURRENCY`], amount zero.
    pub fn none() -> Self {
        Self {
            currency: NO_CURRENCY.to_string(),
            amount: Decimal::ZERO,
        }
    }

    /// Whether this value is the "no cost" sentinel.
    pub fn is_none(&self) -> bool {
        self.currency == NO_CURRENCY && self.amount.is_zero()
    }
}

/// Provider-reported session outcome, treated as an opaque symbolic tag.
///
/// The provider's value set is not documented anywhere we can rely on, so
/// tags are carried verbatim and never validated against an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionStatus(String);

impl SessionStatus {
    /// Wrap a provider-reported status tag verbatim.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag exactly as the provider reported it.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionStatus {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// One USSD session as reported by the provider's export endpoint.
///
/// Constructed only by decoding one export CSV row; never mutated afterward.
/// `session_id` is opaque provider data and is not used for deduplication -
/// the pagination engine deduplicates by date instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Session start, anchored to the provider's response timezone
    pub date: DateTime<FixedOffset>,
    /// Opaque provider-assigned identifier, not validated
    pub session_id: String,
    /// USSD service code the session ran against (opaque)
    pub service_code: String,
    /// Subscriber phone number (opaque, not validated or masked)
    pub phone_number: String,
    /// Number of USSD round trips in the session
    pub hops: u32,
    /// Session length, parsed from the provider's seconds-suffixed text
    pub duration: Duration,
    /// What the session cost the subscriber
    pub cost: Cost,
    /// Provider-reported session outcome
    pub status: SessionStatus,
    /// Text the subscriber entered, absent when the provider reports `N/A`
    pub input: Option<String>,
}

impl Session {
    /// Calendar date of the session in the provider's request timezone.
    ///
    /// This is the date the pagination engine windows and partitions by; it
    /// deliberately differs from the response timezone the timestamp itself
    /// is anchored to.
    pub fn request_date(&self) -> NaiveDate {
        self.date.with_timezone(&request_offset()).date_naive()
    }
}
