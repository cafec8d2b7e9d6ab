//! Line source for the log indexer pipeline.
//!
//! Reads raw lines lazily from a file or any other buffered async reader.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::errors::PipelineError;
use log_indexer_shared::RawLine;

/// Name reported for a source reading standard input.
pub const STDIN_SOURCE_NAME: &str = "<stdin>";

/// A line source with its reader type erased.
pub type BoxedLineSource = LineSource<Box<dyn AsyncBufRead + Unpin + Send>>;

/// Sequential, finite provider of raw lines.
///
/// Only the current line is held in memory. The underlying reader is closed
/// when the source is dropped.
pub struct LineSource<R> {
    reader: R,
    name: String,
    lines_read: u64,
    buf: Vec<u8>,
    // The last line ended in `\r`; a `\n` right after it belongs to that line.
    skip_lf: bool,
}

impl LineSource<BufReader<File>> {
    /// Open a file as a line source.
    ///
    /// # Returns
    ///
    /// * `Ok(LineSource)` - A source positioned at the first line
    /// * `Err(PipelineError::SourceError)` - If the file cannot be opened
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let file = File::open(path).await.map_err(|e| {
            PipelineError::source(format!("Failed to open {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), "Opened log file");

        Ok(Self::from_reader(
            BufReader::new(file),
            path.display().to_string(),
        ))
    }
}

impl LineSource<BufReader<tokio::io::Stdin>> {
    /// Read lines from standard input.
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()), STDIN_SOURCE_NAME)
    }
}

impl<R: AsyncBufRead + Unpin> LineSource<R> {
    /// Wrap a buffered reader as a line source.
    pub fn from_reader(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            lines_read: 0,
            buf: Vec::new(),
            skip_lf: false,
        }
    }

    /// Name of the source, used in reports and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of lines returned so far.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Read the next line.
    ///
    /// A line ends at `\n`, `\r\n` or a lone `\r`, and the terminator is
    /// removed. Invalid UTF-8 is replaced with U+FFFD rather than failing the
    /// read.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(RawLine))` - The next line
    /// * `Ok(None)` - The source is exhausted
    /// * `Err(PipelineError::SourceError)` - If reading fails
    pub async fn next_line(&mut self) -> Result<Option<RawLine>, PipelineError> {
        self.buf.clear();
        let mut terminated = false;

        loop {
            let available = self.reader.fill_buf().await.map_err(|e| {
                PipelineError::source(format!(
                    "Failed to read line {} of {}: {}",
                    self.lines_read + 1,
                    self.name,
                    e
                ))
            })?;

            if available.is_empty() {
                break;
            }

            let mut start = 0;
            if self.skip_lf {
                self.skip_lf = false;
                if available[0] == b'\n' {
                    start = 1;
                }
            }

            match available[start..]
                .iter()
                .position(|&b| b == b'\n' || b == b'\r')
            {
                Some(offset) => {
                    let end = start + offset;
                    self.buf.extend_from_slice(&available[start..end]);
                    self.skip_lf = available[end] == b'\r';
                    self.reader.consume(end + 1);
                    terminated = true;
                    break;
                }
                None => {
                    self.buf.extend_from_slice(&available[start..]);
                    let consumed = available.len();
                    self.reader.consume(consumed);
                }
            }
        }

        if !terminated && self.buf.is_empty() {
            debug!(source = %self.name, lines = self.lines_read, "Line source exhausted");
            return Ok(None);
        }

        self.lines_read += 1;
        let text = String::from_utf8_lossy(&self.buf).into_owned();

        Ok(Some(RawLine::new(self.lines_read, text)))
    }

    /// Erase the reader type so file and stdin sources can be used interchangeably.
    pub fn boxed(self) -> BoxedLineSource
    where
        R: Send + 'static,
    {
        LineSource {
            reader: Box::new(self.reader),
            name: self.name,
            lines_read: self.lines_read,
            buf: self.buf,
            skip_lf: self.skip_lf,
        }
    }
}
