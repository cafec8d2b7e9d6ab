//! Orchestrator module for the log indexer pipeline.
//!
//! Coordinates the line source, parser, and loader components.

use tokio::io::AsyncBufRead;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::PipelineError;
use crate::loader::IndexLoader;
use crate::processor::LineParser;
use crate::report::{LineReport, Reporter, Summary};
use crate::source::LineSource;
use log_indexer_shared::{ParseOutcome, RawLine};

/// Orchestrator that drives lines through the pipeline.
///
/// Each line is fully processed (parse, normalize, index, report) before the
/// next one is read, so records reach the store in source order. Failures of
/// a single line are reported and never end the run.
pub struct Orchestrator {
    parser: LineParser,
    loader: IndexLoader,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(parser: LineParser, loader: IndexLoader) -> Self {
        Self { parser, loader }
    }

    /// Run the pipeline until the source is exhausted.
    ///
    /// The source is consumed and closed when this returns, on success or
    /// error.
    ///
    /// # Returns
    ///
    /// * `Ok(Summary)` - Counters for the completed run
    /// * `Err(PipelineError::SourceError)` - If the source could not be read;
    ///   lines before the failure have already been processed
    #[instrument(skip_all, fields(source = %source.name(), index = %self.loader.index_name()))]
    pub async fn run<R, P>(
        &self,
        mut source: LineSource<R>,
        reporter: &mut P,
    ) -> Result<Summary, PipelineError>
    where
        R: AsyncBufRead + Unpin,
        P: Reporter + ?Sized,
    {
        info!("Starting log ingestion");
        reporter.started(source.name());

        let mut summary = Summary::default();

        loop {
            let raw = match source.next_line().await {
                Ok(Some(raw)) => raw,
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, lines = source.lines_read(), "Line source failed");
                    return Err(e);
                }
            };

            let report = self.process_line(&raw, &mut summary).await;
            reporter.line(&report);
            summary.record(&report);
        }

        reporter.completed(&summary);
        info!(
            lines = summary.lines,
            indexed = summary.indexed,
            unparsed = summary.unparsed,
            failed = summary.failed,
            timestamp_fallbacks = summary.timestamp_fallbacks,
            "Log ingestion completed"
        );
        if summary.has_failures() {
            warn!(failed = summary.failed, "Some lines could not be indexed");
        }

        Ok(summary)
    }

    /// Process a single line.
    async fn process_line(&self, raw: &RawLine, summary: &mut Summary) -> LineReport {
        let record = match self.parser.parse_raw(raw) {
            ParseOutcome::Matched(record) => record,
            ParseOutcome::Unmatched(text) => {
                debug!(line = raw.number, "Line did not match log pattern");
                return LineReport::Unparsed {
                    line: raw.number,
                    text,
                };
            }
        };

        if record.timestamp().is_fallback() {
            summary.timestamp_fallbacks += 1;
            warn!(
                line = raw.number,
                timestamp = %record.timestamp(),
                "Timestamp could not be normalized, indexing original text"
            );
        }

        match self.loader.load(&record).await {
            Ok(id) => {
                debug!(line = raw.number, id = %id, "Line indexed");
                LineReport::Indexed {
                    line: raw.number,
                    id,
                }
            }
            Err(e) => {
                error!(line = raw.number, error = %e, "Failed to index line");
                LineReport::IndexFailed {
                    line: raw.number,
                    text: raw.trimmed().to_string(),
                    error: e,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoaderConfig;
    use crate::report::ConsoleReporter;
    use async_trait::async_trait;
    use log_indexer_repository::{DocumentIndexClient, SearchError};
    use log_indexer_shared::ParsedRecord;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, BufReader, ReadBuf};
    use uuid::Uuid;

    /// Mock client recording every indexed record, failing on chosen messages.
    struct MockIndexClient {
        indexed: Mutex<Vec<(String, ParsedRecord)>>,
        calls: AtomicUsize,
        fail_on_message: Option<String>,
    }

    impl MockIndexClient {
        fn new() -> Self {
            Self {
                indexed: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                fail_on_message: None,
            }
        }

        fn failing_on(message: &str) -> Self {
            Self {
                fail_on_message: Some(message.to_string()),
                ..Self::new()
            }
        }

        fn messages(&self) -> Vec<String> {
            self.indexed
                .lock()
                .unwrap()
                .iter()
                .map(|(_, record)| record.message().to_string())
                .collect()
        }
    }

    #[async_trait]
    impl DocumentIndexClient for MockIndexClient {
        async fn index_document(
            &self,
            index: &str,
            record: &ParsedRecord,
        ) -> Result<String, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_message.as_deref() == Some(record.message()) {
                return Err(SearchError::connection("simulated transport error"));
            }
            self.indexed
                .lock()
                .unwrap()
                .push((index.to_string(), record.clone()));
            Ok(Uuid::new_v4().to_string())
        }

        async fn ensure_index_exists(&self, _index: &str) -> Result<(), SearchError> {
            Ok(())
        }

        async fn health_check(&self) -> Result<bool, SearchError> {
            Ok(true)
        }
    }

    /// Reporter collecting reports in memory.
    #[derive(Default)]
    struct RecordingReporter {
        started: Vec<String>,
        reports: Vec<LineReport>,
        completed: Option<Summary>,
    }

    impl Reporter for RecordingReporter {
        fn started(&mut self, source: &str) {
            self.started.push(source.to_string());
        }

        fn line(&mut self, report: &LineReport) {
            self.reports.push(report.clone());
        }

        fn completed(&mut self, summary: &Summary) {
            self.completed = Some(*summary);
        }
    }

    /// Reader that yields its data and then fails.
    struct FailingReader {
        data: &'static [u8],
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            if self.data.is_empty() {
                return Poll::Ready(Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk went away",
                )));
            }
            let n = std::cmp::min(buf.remaining(), self.data.len());
            buf.put_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Poll::Ready(Ok(()))
        }
    }

    fn orchestrator(client: Arc<MockIndexClient>) -> Orchestrator {
        Orchestrator::new(
            LineParser::new(),
            IndexLoader::new(client, "application_logs"),
        )
    }

    fn source(input: &'static str) -> LineSource<&'static [u8]> {
        LineSource::from_reader(input.as_bytes(), "test.log")
    }

    #[tokio::test]
    async fn test_indexes_matched_line() {
        let client = Arc::new(MockIndexClient::new());
        let mut reporter = RecordingReporter::default();

        let summary = orchestrator(client.clone())
            .run(
                source("2024-06-13 12:34:56,789 - INFO - User logged in successfully.\n"),
                &mut reporter,
            )
            .await
            .unwrap();

        let indexed = client.indexed.lock().unwrap().clone();
        assert_eq!(indexed.len(), 1);
        let (index, record) = &indexed[0];
        assert_eq!(index, "application_logs");
        assert_eq!(record.timestamp().as_string(), "2024-06-13T12:34:56.789000");
        assert_eq!(record.level(), "INFO");
        assert_eq!(record.message(), "User logged in successfully.");

        assert!(matches!(reporter.reports[0], LineReport::Indexed { line: 1, .. }));
        assert_eq!(summary.indexed, 1);
        assert_eq!(summary.timestamp_fallbacks, 0);
        assert!(!summary.has_failures());
    }

    #[tokio::test]
    async fn test_unparsed_line_is_reported_not_indexed() {
        let client = Arc::new(MockIndexClient::new());
        let mut reporter = RecordingReporter::default();

        let summary = orchestrator(client.clone())
            .run(source("garbage line with no structure\n"), &mut reporter)
            .await
            .unwrap();

        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            reporter.reports,
            vec![LineReport::Unparsed {
                line: 1,
                text: "garbage line with no structure".to_string(),
            }]
        );
        assert_eq!(summary.unparsed, 1);
    }

    #[tokio::test]
    async fn test_invalid_date_is_indexed_with_raw_timestamp() {
        let client = Arc::new(MockIndexClient::new());
        let mut reporter = RecordingReporter::default();

        let summary = orchestrator(client.clone())
            .run(source("2024-13-99 00:00:00,000 - WARN - bad date"), &mut reporter)
            .await
            .unwrap();

        let indexed = client.indexed.lock().unwrap().clone();
        assert_eq!(indexed[0].1.timestamp().as_string(), "2024-13-99 00:00:00,000");
        assert_eq!(indexed[0].1.level(), "WARN");
        assert_eq!(indexed[0].1.message(), "bad date");
        assert_eq!(summary.indexed, 1);
        assert_eq!(summary.timestamp_fallbacks, 1);
    }

    #[tokio::test]
    async fn test_index_failure_does_not_stop_run() {
        let client = Arc::new(MockIndexClient::failing_on("second"));
        let mut reporter = RecordingReporter::default();

        let summary = orchestrator(client.clone())
            .run(
                source(
                    "2024-06-13 12:34:56,001 - INFO - first\n\
                     2024-06-13 12:34:56,002 - INFO - second\n\
                     2024-06-13 12:34:56,003 - INFO - third\n",
                ),
                &mut reporter,
            )
            .await
            .unwrap();

        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
        assert_eq!(client.messages(), vec!["first", "third"]);
        match &reporter.reports[1] {
            LineReport::IndexFailed { line, text, error } => {
                assert_eq!(*line, 2);
                assert_eq!(text, "2024-06-13 12:34:56,002 - INFO - second");
                assert!(matches!(error, SearchError::ConnectionError(_)));
            }
            other => panic!("expected IndexFailed, got {:?}", other),
        }
        assert!(matches!(reporter.reports[2], LineReport::Indexed { line: 3, .. }));
        assert_eq!(summary.indexed, 2);
        assert_eq!(summary.failed, 1);
        assert!(summary.has_failures());
    }

    #[tokio::test]
    async fn test_records_indexed_in_source_order() {
        let client = Arc::new(MockIndexClient::new());
        let mut reporter = RecordingReporter::default();
        let input = "2024-06-13 12:00:00,000 - INFO - a\n\
                     not a log line\n\
                     2024-06-13 12:00:01,000 - ERROR - b\n\
                     \n\
                     2024-06-13 12:00:02,000 - DEBUG - c\n";

        let summary = orchestrator(client.clone())
            .run(source(input), &mut reporter)
            .await
            .unwrap();

        assert_eq!(client.messages(), vec!["a", "b", "c"]);
        let lines: Vec<u64> = reporter.reports.iter().map(LineReport::line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            summary,
            Summary {
                lines: 5,
                indexed: 3,
                unparsed: 2,
                failed: 0,
                timestamp_fallbacks: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_reports_start_and_completion() {
        let client = Arc::new(MockIndexClient::new());
        let mut reporter = RecordingReporter::default();

        let summary = orchestrator(client)
            .run(source(""), &mut reporter)
            .await
            .unwrap();

        assert_eq!(reporter.started, vec!["test.log"]);
        assert!(reporter.reports.is_empty());
        assert_eq!(reporter.completed, Some(summary));
        assert_eq!(summary, Summary::default());
    }

    #[tokio::test]
    async fn test_console_output_for_mixed_input() {
        let client = Arc::new(MockIndexClient::failing_on("boom"));
        let mut reporter = ConsoleReporter::new(Vec::new());

        orchestrator(client)
            .run(
                source(
                    "garbage\n\
                     2024-06-13 12:34:56,789 - ERROR - boom\n",
                ),
                &mut reporter,
            )
            .await
            .unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Processing log file: test.log");
        assert_eq!(lines[1], "Could not parse line: garbage");
        assert_eq!(
            lines[2],
            "Failed to index line 2 (2024-06-13 12:34:56,789 - ERROR - boom): \
             Connection error: simulated transport error"
        );
        assert_eq!(
            lines[3],
            "Log processing completed. 2 lines read, 0 indexed, 1 unparsed, 1 failed"
        );
    }

    #[tokio::test]
    async fn test_source_error_aborts_after_processed_lines() {
        let client = Arc::new(MockIndexClient::new());
        let mut reporter = RecordingReporter::default();
        let reader = BufReader::new(FailingReader {
            data: b"2024-06-13 12:34:56,789 - INFO - before failure\n",
        });

        let result = orchestrator(client.clone())
            .run(LineSource::from_reader(reader, "failing"), &mut reporter)
            .await;

        assert!(matches!(result, Err(PipelineError::SourceError(_))));
        assert_eq!(client.messages(), vec!["before failure"]);
        assert!(reporter.completed.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_config_is_used() {
        let client = Arc::new(MockIndexClient::failing_on("always"));
        let loader = IndexLoader::with_config(
            client.clone(),
            "application_logs",
            LoaderConfig {
                max_retries: 2,
                initial_retry_delay_ms: 10,
                max_retry_delay_ms: 20,
            },
        );
        let mut reporter = RecordingReporter::default();

        let summary = Orchestrator::new(LineParser::new(), loader)
            .run(source("2024-06-13 12:34:56,789 - INFO - always\n"), &mut reporter)
            .await
            .unwrap();

        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
        assert_eq!(summary.failed, 1);
    }
}
