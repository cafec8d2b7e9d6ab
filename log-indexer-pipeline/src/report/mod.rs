//! Operator-facing reports.
//!
//! Every input line produces exactly one [`LineReport`]. Reports are written
//! to a [`Reporter`] as they happen and folded into a [`Summary`] of counters,
//! so a run never buffers per-line results.

use std::fmt;
use std::io::{self, Write};

use tracing::warn;

use log_indexer_repository::SearchError;

/// Outcome of processing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineReport {
    /// The line was parsed and indexed.
    Indexed {
        /// 1-based line number.
        line: u64,
        /// Identifier assigned by the store.
        id: String,
    },
    /// The line did not match the log pattern.
    Unparsed {
        /// 1-based line number.
        line: u64,
        /// The trimmed line text.
        text: String,
    },
    /// The line was parsed but the store did not accept it.
    IndexFailed {
        /// 1-based line number.
        line: u64,
        /// The trimmed line text.
        text: String,
        /// Why indexing failed.
        error: SearchError,
    },
}

impl LineReport {
    /// 1-based number of the line this report is about.
    pub fn line(&self) -> u64 {
        match self {
            Self::Indexed { line, .. }
            | Self::Unparsed { line, .. }
            | Self::IndexFailed { line, .. } => *line,
        }
    }
}

impl fmt::Display for LineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed { id, .. } => write!(f, "Indexed document ID: {}", id),
            Self::Unparsed { text, .. } => write!(f, "Could not parse line: {}", text),
            Self::IndexFailed { line, text, error } => {
                write!(f, "Failed to index line {} ({}): {}", line, text, error)
            }
        }
    }
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Lines read from the source.
    pub lines: u64,
    /// Lines indexed successfully.
    pub indexed: u64,
    /// Lines that did not match the log pattern.
    pub unparsed: u64,
    /// Matched lines the store did not accept.
    pub failed: u64,
    /// Matched lines whose timestamp was kept in its original form.
    pub timestamp_fallbacks: u64,
}

impl Summary {
    /// Count one line outcome.
    pub fn record(&mut self, report: &LineReport) {
        self.lines += 1;
        match report {
            LineReport::Indexed { .. } => self.indexed += 1,
            LineReport::Unparsed { .. } => self.unparsed += 1,
            LineReport::IndexFailed { .. } => self.failed += 1,
        }
    }

    /// Whether any matched line failed to index.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines read, {} indexed, {} unparsed, {} failed",
            self.lines, self.indexed, self.unparsed, self.failed
        )
    }
}

/// Sink for operator-facing status output.
pub trait Reporter: Send {
    /// Processing of `source` is about to begin.
    fn started(&mut self, source: &str);

    /// One line has been processed.
    fn line(&mut self, report: &LineReport);

    /// The source was exhausted.
    fn completed(&mut self, summary: &Summary);
}

/// Reporter writing one human-readable line per event.
pub struct ConsoleReporter<W = io::Stdout> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    /// Report to standard output.
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Report to the given writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{}", args).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write report line");
        }
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn started(&mut self, source: &str) {
        self.write_line(format_args!("Processing log file: {}", source));
    }

    fn line(&mut self, report: &LineReport) {
        self.write_line(format_args!("{}", report));
    }

    fn completed(&mut self, summary: &Summary) {
        self.write_line(format_args!("Log processing completed. {}", summary));
    }
}
