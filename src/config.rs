//! Credentials from the process environment
//!
//! The export core never reads the environment itself; it receives these
//! values as plain parameters. This module is the one place that knows
//! where they come from.

/// Environment variable holding the dashboard application identifier sent
/// as `X-Client-Id` (e.g. `nest.account.dashboard`).
pub const CLIENT_ID_VAR: &str = "USSD_EXPORT_CLIENT_ID";

/// Environment variable holding the dashboard account email.
pub const EMAIL_VAR: &str = "USSD_EXPORT_EMAIL";

/// Environment variable holding the dashboard account password.
pub const PASSWORD_VAR: &str = "USSD_EXPORT_PASSWORD";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable was unset or not unicode
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
}

/// The three opaque values an export run needs.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Application identifier sent as `X-Client-Id`
    pub client_id: String,
    /// Dashboard account email
    pub email: String,
    /// Dashboard account password
    pub password: String,
}

impl ExportConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingVar`] naming the first unset variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: read_var(CLIENT_ID_VAR)?,
            email: read_var(EMAIL_VAR)?,
            password: read_var(PASSWORD_VAR)?,
        })
    }
}

fn read_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}
