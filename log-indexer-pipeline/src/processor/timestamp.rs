//! Timestamp normalization.
//!
//! Log lines carry timestamps like `2024-06-13 12:34:56,789`. These are
//! converted to the canonical ISO-8601 form before indexing. Digits from
//! any script (Arabic-Indic, full-width and so on) are read by value.

use std::borrow::Cow;

use chrono::{NaiveDateTime, Timelike};

use log_indexer_shared::LogTimestamp;

/// Format of timestamps as they appear in log lines.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Code points of the digit zero in every Unicode decimal digit (`Nd`) run.
///
/// Each run holds the ten digits 0-9 in order, so a digit's value is its
/// distance from the nearest zero at or below it.
const DECIMAL_DIGIT_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
    0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

/// Value of a Unicode decimal digit, `None` for anything else.
fn decimal_digit_value(c: char) -> Option<u32> {
    let code = u32::from(c);
    let idx = DECIMAL_DIGIT_ZEROS.partition_point(|&zero| zero <= code);
    let zero = DECIMAL_DIGIT_ZEROS[..idx].last()?;
    let value = code - zero;
    (value < 10).then_some(value)
}

/// Rewrite non-ASCII decimal digits as their ASCII equivalents.
fn ascii_digits(raw: &str) -> Cow<'_, str> {
    if raw.is_ascii() {
        return Cow::Borrowed(raw);
    }

    Cow::Owned(
        raw.chars()
            .map(|c| match decimal_digit_value(c) {
                Some(value) if !c.is_ascii() => char::from_digit(value, 10).unwrap_or(c),
                _ => c,
            })
            .collect(),
    )
}

/// Parse a log-line timestamp.
///
/// Returns `Normalized` when `raw` is a valid calendar date and time in
/// [`LOG_TIMESTAMP_FORMAT`], otherwise `FallbackRaw` holding `raw` unchanged.
/// Digits may come from any script. Leap seconds are rejected so every
/// normalized value re-parses to the same instant.
pub fn normalize(raw: &str) -> LogTimestamp {
    match NaiveDateTime::parse_from_str(&ascii_digits(raw), LOG_TIMESTAMP_FORMAT) {
        Ok(dt) if dt.nanosecond() < 1_000_000_000 => LogTimestamp::Normalized(dt),
        _ => LogTimestamp::FallbackRaw(raw.to_string()),
    }
}

/// Like [`normalize`], rendered straight to the string stored in the index.
pub fn normalize_to_string(raw: &str) -> String {
    normalize(raw).as_string()
}
