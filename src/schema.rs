//! Export column schema and header validation
//!
//! The export endpoint's column set is fixed. A header that deviates from it
//! means every subsequent decode is unsafe, so validation failure is a hard
//! stop carrying a three-way diff for diagnostics, not a recoverable
//! condition. An entirely empty response body (no header at all) is not a
//! schema error - it is how the pagination engine recognizes exhaustion and
//! is handled before validation is reached.

use std::collections::BTreeSet;

/// The export columns, in the order the provider emits them and the order
/// the output file preserves.
pub const COLUMNS: [&str; 9] = [
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

/// Header validation failure carrying the three-way column diff.
///
/// Column names are compared with embedded whitespace removed, so the sets
/// hold the whitespace-stripped forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("export schema mismatch: missing {expected_only:?}, unexpected {actual_only:?}, matched {common:?}")]
pub struct SchemaMismatchError {
    /// Columns the schema defines but the response header lacked
    pub expected_only: BTreeSet<String>,
    /// Columns the response header carried but the schema does not define
    pub actual_only: BTreeSet<String>,
    /// Columns present on both sides
    pub common: BTreeSet<String>,
}

fn strip_whitespace(token: &str) -> String {
    token.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Validate a response header against [`COLUMNS`].
///
/// Tokens are compared ignoring embedded whitespace, so a provider header of
/// `Session Id` matches the schema's `SessionId`.
///
/// # Errors
/// Returns [`SchemaMismatchError`] if any column is present on one side only.
pub fn validate_header<'a, I>(actual: I) -> Result<(), SchemaMismatchError>
where
    I: IntoIterator<Item = &'a str>,
{
    let expected: BTreeSet<String> = COLUMNS.iter().map(|c| strip_whitespace(c)).collect();
    let actual: BTreeSet<String> = actual.into_iter().map(strip_whitespace).collect();

    let expected_only: BTreeSet<String> = expected.difference(&actual).cloned().collect();
    let actual_only: BTreeSet<String> = actual.difference(&expected).cloned().collect();

    if expected_only.is_empty() && actual_only.is_empty() {
        return Ok(());
    }

    Err(SchemaMismatchError {
        expected_only,
        actual_only,
        common: expected.intersection(&actual).cloned().collect(),
    })
}
