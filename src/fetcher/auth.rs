//! Provider sign-in
//!
//! External collaborator to the export core: trades dashboard credentials
//! for the bearer token the export endpoint requires. The token is plain
//! provider data; nothing here inspects or refreshes it.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{FetchError, FetchResult};
use crate::REQUEST_UTC_OFFSET_MINUTES;

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "timeOffset")]
    time_offset: i32,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    data: SignInData,
}

#[derive(Debug, Deserialize)]
struct SignInData {
    access_token: String,
}

/// Sign in against `{base_url}/auth/signin` and return the access token.
///
/// # Arguments
/// * `client` - Shared HTTP client
/// * `base_url` - Provider API base URL, no trailing slash
/// * `email` - Dashboard account email
/// * `password` - Dashboard account password
///
/// # Errors
/// Returns [`FetchError::Transport`] on network failure and
/// [`FetchError::Auth`] on a non-success status or a response missing
/// `data.access_token`.
pub async fn sign_in(
    client: &Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> FetchResult<String> {
    let url = format!("{base_url}/auth/signin");
    let request = SignInRequest {
        email,
        password,
        time_offset: REQUEST_UTC_OFFSET_MINUTES,
    };

    info!("Signing in as {}", email);

    let response = client
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Auth(format!("sign-in failed with {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let token = parse_token(&body)?;
    debug!("Sign-in succeeded");
    Ok(token)
}

/// Extract `data.access_token` from a sign-in response body.
fn parse_token(body: &str) -> FetchResult<String> {
    let response: SignInResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Auth(format!("malformed sign-in response: {e}")))?;
    Ok(response.data.access_token)
}
