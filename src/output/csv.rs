//! CSV output writer implementation

use csv::Writer;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use super::{OutputError, OutputResult, OutputWriter, SessionWriter};
use crate::{codec, schema, Session};

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

/// Flush to disk every this many sessions
const FLUSH_INTERVAL: u64 = 1_000;

/// CSV writer for exported sessions.
///
/// Writes the nine-column schema header on creation, then one row per
/// session in the order the pagination engine produced them, each field
/// encoded by the codec. Rows already flushed before a failed run stay in
/// the file; truncation at the failure point is the documented behavior.
pub struct CsvSessionWriter {
    writer: Writer<BufWriter<File>>,
    sessions_written: u64,
}

impl CsvSessionWriter {
    /// Create a new CSV session writer with the default buffer size.
    pub fn new<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        Self::new_with_buffer_size(path, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new CSV session writer with a custom buffer size.
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `buffer_size` - Size of the write buffer in bytes
    pub fn new_with_buffer_size<P: AsRef<Path>>(
        path: P,
        buffer_size: usize,
    ) -> OutputResult<Self> {
        let path = path.as_ref();
        info!("Creating CSV session writer: path={}", path.display());

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("Failed to create directory: {e}")))?;
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {e}")))?;

        let buf_writer = BufWriter::with_capacity(buffer_size, file);
        let mut csv_writer = Writer::from_writer(buf_writer);

        csv_writer
            .write_record(schema::COLUMNS)
            .map_err(|e| OutputError::CsvError(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer: csv_writer,
            sessions_written: 0,
        })
    }

    /// Get number of sessions written so far
    pub fn sessions_written(&self) -> u64 {
        self.sessions_written
    }
}

impl SessionWriter for CsvSessionWriter {
    fn write_session(&mut self, session: &Session) -> OutputResult<()> {
        let row = codec::encode_row(session);

        self.writer
            .write_record(&row)
            .map_err(|e| OutputError::CsvError(format!("Failed to write session: {e}")))?;

        self.sessions_written += 1;

        if self.sessions_written % FLUSH_INTERVAL == 0 {
            self.flush()?;
            debug!("Progress: {} sessions written", self.sessions_written);
        }

        Ok(())
    }
}

impl OutputWriter for CsvSessionWriter {
    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("Failed to flush: {e}")))
    }

    fn close(mut self) -> OutputResult<()> {
        debug!(
            "Closing CSV session writer: {} total sessions written",
            self.sessions_written
        );

        self.flush()?;

        let buf_writer = self
            .writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {e}")))?;

        let file = buf_writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get file handle: {e}")))?;

        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {e}")))?;

        info!(
            "CSV session writer closed: {} sessions written",
            self.sessions_written
        );
        Ok(())
    }
}
