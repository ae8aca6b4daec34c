//! Export output writers

use crate::Session;

pub mod csv;

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Buffer flush error
    #[error("flush error: {0}")]
    FlushError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Generic output writer lifecycle
pub trait OutputWriter {
    /// Flush any buffered data to disk
    fn flush(&mut self) -> OutputResult<()>;

    /// Close the writer and finalize output
    fn close(self) -> OutputResult<()>;
}

/// Trait for writing exported sessions
pub trait SessionWriter: OutputWriter {
    /// Write a single session to output
    fn write_session(&mut self, session: &Session) -> OutputResult<()>;

    /// Write multiple sessions at once
    fn write_sessions(&mut self, sessions: &[Session]) -> OutputResult<()> {
        for session in sessions {
            self.write_session(session)?;
        }
        Ok(())
    }
}
