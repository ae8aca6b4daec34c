//! Export command implementation
//!
//! The thin driver over the pagination engine: sign in, walk the history
//! stream to exhaustion, re-encode each session, and hand rows to the
//! output writer. Holds no engine state of its own; errors propagate
//! uncaught, so a failed run leaves either no file or a file truncated at
//! the failure point.

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

use super::CliError;
use crate::config::ExportConfig;
use crate::fetcher::auth;
use crate::fetcher::http::HttpPageFetcher;
use crate::fetcher::pagination::SessionHistory;
use crate::output::csv::CsvSessionWriter;
use crate::output::{OutputWriter, SessionWriter};
use crate::request_offset;

/// USSD session history exporter
#[derive(Debug, Parser)]
#[command(name = "ussd-session-exporter", version, about)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export the full session history to a CSV file
    Export(ExportArgs),
}

/// Arguments for the export command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Provider API base URL (no trailing slash)
    #[arg(long)]
    pub base_url: String,

    /// Most recent date to export, YYYY-MM-DD.
    /// Defaults to today in the provider's timezone.
    #[arg(long)]
    pub end_date: Option<String>,

    /// Output CSV file path
    #[arg(short, long, default_value = "./sessions.csv")]
    pub output: PathBuf,
}

impl ExportArgs {
    /// Run the export: sign in, drain the history, write the CSV.
    ///
    /// # Errors
    /// Propagates configuration, fetch, and output errors unchanged; there
    /// is no retry and no partial-export recovery.
    pub async fn execute(&self) -> Result<(), CliError> {
        let config = ExportConfig::from_env()?;
        let end_date = self.resolve_end_date()?;

        info!("Exporting sessions up to {}", end_date);

        let client = reqwest::Client::new();
        let token =
            auth::sign_in(&client, &self.base_url, &config.email, &config.password).await?;
        let fetcher = HttpPageFetcher::new(
            client,
            self.base_url.clone(),
            config.client_id,
            token,
        );

        let mut writer = CsvSessionWriter::new(&self.output)?;

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {pos} sessions exported")
                .expect("hardcoded template is valid"),
        );

        let mut stream = SessionHistory::new(fetcher, end_date).into_stream();
        while let Some(session) = stream.next().await {
            writer.write_session(&session?)?;
            progress.inc(1);
        }
        progress.finish_and_clear();

        let total = writer.sessions_written();
        writer.close()?;

        info!(
            "Export complete: {} sessions written to {}",
            total,
            self.output.display()
        );
        Ok(())
    }

    fn resolve_end_date(&self) -> Result<NaiveDate, CliError> {
        match &self.end_date {
            Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map_err(|e| CliError::InvalidArgument(format!("invalid end date '{text}': {e}"))),
            None => Ok(Utc::now().with_timezone(&request_offset()).date_naive()),
        }
    }
}
