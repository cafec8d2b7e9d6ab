//! Log line parser implementation.
//!
//! Matches lines of the form
//! `2024-06-13 12:34:56,789 - INFO - User logged in successfully.`
//! and turns them into [`ParsedRecord`]s.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::processor::timestamp;
use log_indexer_shared::{ParseOutcome, ParsedRecord, RawLine};

/// `<date> <time>,<millis> - <LEVEL> - <message>`. Digits may come from any
/// script; the level is ASCII uppercase.
static LOG_LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<timestamp>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2},\d{3}) - (?P<level>[A-Z]+) - (?P<message>.*)$",
    )
    .expect("log line pattern is a valid regex")
});

/// Parser that turns raw log lines into structured records.
///
/// Parsing is pure: any input, including empty or binary-looking text,
/// produces a [`ParseOutcome`] and never an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineParser;

impl LineParser {
    /// Create a new line parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse one line.
    ///
    /// The line is trimmed first. On a match the timestamp is normalized;
    /// when normalization fails the record keeps the timestamp text as it
    /// appeared in the line.
    pub fn parse(&self, line: &str) -> ParseOutcome {
        let trimmed = line.trim();

        match LOG_LINE_PATTERN.captures(trimmed) {
            Some(caps) => ParseOutcome::Matched(ParsedRecord::new(
                timestamp::normalize(&caps["timestamp"]),
                &caps["level"],
                &caps["message"],
            )),
            None => ParseOutcome::Unmatched(trimmed.to_string()),
        }
    }

    /// Parse a line read from a line source.
    pub fn parse_raw(&self, raw: &RawLine) -> ParseOutcome {
        self.parse(&raw.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log_indexer_shared::LogTimestamp;

    fn matched(line: &str) -> ParsedRecord {
        match LineParser::new().parse(line) {
            ParseOutcome::Matched(record) => record,
            ParseOutcome::Unmatched(text) => panic!("expected a match, got Unmatched({:?})", text),
        }
    }

    fn unmatched(line: &str) -> String {
        match LineParser::new().parse(line) {
            ParseOutcome::Unmatched(text) => text,
            ParseOutcome::Matched(record) => panic!("expected no match, got {:?}", record),
        }
    }

    #[test]
    fn test_parse_well_formed_line() {
        let record = matched("2024-06-13 12:34:56,789 - INFO - User logged in successfully.");

        assert_eq!(record.timestamp().as_string(), "2024-06-13T12:34:56.789000");
        assert!(!record.timestamp().is_fallback());
        assert_eq!(record.level(), "INFO");
        assert_eq!(record.message(), "User logged in successfully.");
    }

    #[test]
    fn test_parse_garbage_line() {
        let parser = LineParser::new();

        assert_eq!(
            parser.parse("garbage line with no structure"),
            ParseOutcome::Unmatched("garbage line with no structure".to_string())
        );
    }

    #[test]
    fn test_parse_invalid_calendar_date_keeps_raw_timestamp() {
        let record = matched("2024-13-99 00:00:00,000 - WARN - bad date");

        assert_eq!(
            record.timestamp(),
            &LogTimestamp::FallbackRaw("2024-13-99 00:00:00,000".to_string())
        );
        assert_eq!(record.level(), "WARN");
        assert_eq!(record.message(), "bad date");
    }

    #[test]
    fn test_message_keeps_further_separators() {
        let record = matched("2024-06-13 12:34:56,789 - ERROR - upstream - timeout - retrying");

        assert_eq!(record.level(), "ERROR");
        assert_eq!(record.message(), "upstream - timeout - retrying");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let record = matched("  \t2024-06-13 12:34:56,789 - DEBUG - padded message   \r\n");

        assert_eq!(record.level(), "DEBUG");
        assert_eq!(record.message(), "padded message");

        assert_eq!(unmatched("   not a log line  \n"), "not a log line");
    }

    #[test]
    fn test_message_may_contain_any_characters() {
        let record = matched("2024-06-13 12:34:56,789 - INFO - ünïcödé {\"k\": [1, 2]} ✓");

        assert_eq!(record.message(), "ünïcödé {\"k\": [1, 2]} ✓");
    }

    #[test]
    fn test_single_space_message() {
        // Inner whitespace survives trimming when followed by text
        let record = matched("2024-06-13 12:34:56,789 - INFO -  x");

        assert_eq!(record.message(), " x");
    }

    #[test]
    fn test_empty_message_after_trim_does_not_match() {
        // Trimming removes the space after the final separator
        assert_eq!(
            unmatched("2024-06-13 12:34:56,789 - INFO - "),
            "2024-06-13 12:34:56,789 - INFO -"
        );
    }

    #[test]
    fn test_non_uppercase_level_does_not_match() {
        for line in [
            "2024-06-13 12:34:56,789 - info - lowercase",
            "2024-06-13 12:34:56,789 - Info - mixed",
            "2024-06-13 12:34:56,789 - INF0 - digit",
            "2024-06-13 12:34:56,789 -  - empty level",
            "2024-06-13 12:34:56,789 - ÉRROR - non-ascii",
        ] {
            assert_eq!(unmatched(line), line);
        }
    }

    #[test]
    fn test_malformed_timestamp_does_not_match() {
        for line in [
            "24-06-13 12:34:56,789 - INFO - short year",
            "2024-6-13 12:34:56,789 - INFO - short month",
            "2024-06-13 12:34:56.789 - INFO - dot millis",
            "2024-06-13 12:34:56,78 - INFO - two digit millis",
            "2024-06-13 12:34:56,7890 - INFO - four digit millis",
            "2024-06-13T12:34:56,789 - INFO - iso separator",
            "2024-06-1a 12:34:56,789 - INFO - letter in date",
            "2024-06-13 12:34:56,7\u{B2}9 - INFO - superscript digit",
        ] {
            assert_eq!(unmatched(line), line);
        }
    }

    #[test]
    fn test_non_ascii_digits_match_and_normalize() {
        let record = matched("\u{662}\u{660}\u{662}\u{664}-06-13 12:34:56,789 - INFO - x");

        assert_eq!(record.timestamp().as_string(), "2024-06-13T12:34:56.789000");
        assert!(!record.timestamp().is_fallback());
        assert_eq!(record.level(), "INFO");
        assert_eq!(record.message(), "x");

        let record = matched("２０２４-06-13 12:34:56,789 - INFO - fullwidth digits");
        assert_eq!(record.timestamp().as_string(), "2024-06-13T12:34:56.789000");
    }

    #[test]
    fn test_non_ascii_digits_invalid_date_keeps_raw_timestamp() {
        let record = matched("２０２４-13-99 00:00:00,000 - WARN - bad date");

        assert_eq!(
            record.timestamp(),
            &LogTimestamp::FallbackRaw("２０２４-13-99 00:00:00,000".to_string())
        );
    }

    #[test]
    fn test_missing_separators_do_not_match() {
        for line in [
            "2024-06-13 12:34:56,789 INFO User logged in",
            "2024-06-13 12:34:56,789 - INFO User logged in",
            "2024-06-13 12:34:56,789 -INFO- User logged in",
            "prefix 2024-06-13 12:34:56,789 - INFO - anchored at start",
        ] {
            assert_eq!(unmatched(line), line);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(unmatched(""), "");
        assert_eq!(unmatched(" \t\r\n"), "");
    }

    #[test]
    fn test_parse_raw_uses_line_text() {
        let raw = RawLine::new(7, "2024-06-13 12:34:56,789 - INFO - from source");

        match LineParser::new().parse_raw(&raw) {
            ParseOutcome::Matched(record) => assert_eq!(record.message(), "from source"),
            ParseOutcome::Unmatched(text) => panic!("expected a match, got Unmatched({:?})", text),
        }
    }
}
