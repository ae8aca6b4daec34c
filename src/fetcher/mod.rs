//! Provider data fetching
//!
//! Sign-in, the export HTTP client, and the backward pagination engine.
//! The [`PageFetcher`] trait is the seam between the engine and the
//! transport: the engine only ever asks for one date-bounded page at a time,
//! and tests substitute scripted fetchers for the real HTTP client.

use crate::codec::FormatError;
use crate::schema::SchemaMismatchError;
use crate::Session;
use async_trait::async_trait;
use chrono::NaiveDate;
use futures_util::Stream;
use std::pin::Pin;

pub mod auth;
pub mod http;
pub mod pagination;

/// Records per export page, fixed by the provider.
///
/// A requested range holding more than this many records is silently
/// truncated to the most recent ones; detecting and recovering from that is
/// the pagination engine's job.
pub const PAGE_CAPACITY: usize = 10_000;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network or HTTP failure; not retried here - retry policy belongs to
    /// the transport, not this core
    #[error("transport error: {0}")]
    Transport(String),

    /// Sign-in failure or malformed sign-in response
    #[error("auth error: {0}")]
    Auth(String),

    /// Response header did not match the export schema; fatal for the run
    #[error("schema mismatch: {0}")]
    Schema(#[from] SchemaMismatchError),

    /// A field's text did not match its expected encoding; fatal for the page
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// CSV tokenization failure in the response body
    #[error("CSV error: {0}")]
    Csv(String),
}

/// Result type for fetcher operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Stream of sessions from the pagination engine
pub type SessionStream = Pin<Box<dyn Stream<Item = FetchResult<Session>> + Send>>;

/// One date-bounded page request against the provider.
///
/// Both dates are inclusive calendar dates in the provider's request
/// timezone. Implementations must preserve the provider's response order,
/// which the engine assumes to be reverse-chronological - an external
/// contract the core exploits but cannot verify.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch every retained session in `[start, end]`, capped at
    /// [`PAGE_CAPACITY`], newest first.
    ///
    /// # Errors
    /// Surfaces transport failures, schema mismatches, and field format
    /// errors to the caller without retry.
    async fn fetch_page(&self, start: NaiveDate, end: NaiveDate) -> FetchResult<Vec<Session>>;
}
