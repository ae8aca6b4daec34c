//! Export endpoint HTTP client
//!
//! Issues one bounded request per date window against
//! `{base_url}/ussd/sessions/export` and decodes the CSV body into typed
//! [`Session`] records. One call, one network request: no retry here, no
//! pagination - the engine owns window arithmetic, the transport owns retry
//! policy if anyone does.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tracing::debug;

use super::{FetchError, FetchResult, PageFetcher, PAGE_CAPACITY};
use crate::{codec, schema, Session};

/// Calendar-date format the provider accepts on requests. Deliberately not
/// the format it emits on responses; the codec owns that side.
const REQUEST_DATE_FORMAT: &str = "%Y-%m-%d";

/// Header naming the dashboard application a request acts for.
const CLIENT_ID_HEADER: &str = "X-Client-Id";

/// HTTP page fetcher for the provider's export endpoint.
pub struct HttpPageFetcher {
    client: Client,
    base_url: String,
    client_id: String,
    access_token: String,
}

impl HttpPageFetcher {
    /// Create a new export fetcher.
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `base_url` - Provider API base URL, no trailing slash
    /// * `client_id` - Application identifier sent as `X-Client-Id`
    /// * `access_token` - Bearer token from [`super::auth::sign_in`]
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            client_id: client_id.into(),
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, start: NaiveDate, end: NaiveDate) -> FetchResult<Vec<Session>> {
        let url = format!("{}/ussd/sessions/export", self.base_url);
        let params = [
            ("page", "0".to_string()),
            ("count", PAGE_CAPACITY.to_string()),
            ("startDate", start.format(REQUEST_DATE_FORMAT).to_string()),
            ("endDate", end.format(REQUEST_DATE_FORMAT).to_string()),
        ];

        debug!("Fetching export page for {} to {}", start, end);

        let response = self
            .client
            .get(&url)
            .header(CLIENT_ID_HEADER, &self.client_id)
            .bearer_auth(&self.access_token)
            .query(&params)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FetchError::Transport(format!(
                "export request failed with {status}: {body}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let sessions = parse_page(&body)?;
        debug!("Fetched {} sessions", sessions.len());
        Ok(sessions)
    }
}

/// Parse one export response body into sessions.
///
/// An entirely empty body is a legal empty page - the provider's way of
/// saying "no data for this window" - and is not a schema error. A present
/// header is validated against the schema before any row is decoded.
///
/// # Errors
/// Returns [`FetchError::Csv`] on tokenization failure,
/// [`FetchError::Schema`] on header drift, and [`FetchError::Format`] on the
/// first undecodable field.
pub fn parse_page(body: &str) -> FetchResult<Vec<Session>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| FetchError::Csv(e.to_string()))?
        .clone();
    schema::validate_header(headers.iter())?;

    let mut sessions = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| FetchError::Csv(e.to_string()))?;
        sessions.push(codec::decode_row(&record)?);
    }
    Ok(sessions)
}
