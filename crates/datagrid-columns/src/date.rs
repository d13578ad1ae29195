//! Date parsing and display formats.
//!
//! Display formats use the familiar `YYYY-MM-DD HH:mm` token family. A format
//! is compiled once into a chrono strftime string; text inside `[...]` is
//! copied literally.
//!
//! Values are accepted as RFC 3339 strings, `YYYY-MM-DD`,
//! `YYYY-MM-DD HH:mm[:ss]` (with `T` or a space) or epoch milliseconds.
//! Values without an offset are taken as UTC, and all output is in UTC.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Format used when a date column does not name one.
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD HH:mm";

/// Rendered for a non-empty value that is not a date.
pub const INVALID_DATE: &str = "Invalid Date";

/// Display tokens, longest first so prefixes never shadow longer tokens.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("SSS", "%3f"),
    ("A", "%p"),
    ("a", "%P"),
    ("ZZ", "%z"),
    ("Z", "%:z"),
];

const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A compiled display format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    strftime: String,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::compile(DEFAULT_DATE_FORMAT)
    }
}

impl DateFormat {
    /// Compile a token pattern.
    pub fn compile(pattern: &str) -> Self {
        let mut strftime = String::with_capacity(pattern.len() * 2);
        let mut rest = pattern;

        'outer: while let Some(ch) = rest.chars().next() {
            if ch == '[' {
                if let Some(end) = rest.find(']') {
                    push_literal(&mut strftime, &rest[1..end]);
                    rest = &rest[end + 1..];
                    continue;
                }
            }
            for (token, spec) in TOKENS {
                if let Some(tail) = rest.strip_prefix(token) {
                    strftime.push_str(spec);
                    rest = tail;
                    continue 'outer;
                }
            }
            push_literal(&mut strftime, &rest[..ch.len_utf8()]);
            rest = &rest[ch.len_utf8()..];
        }

        Self {
            pattern: pattern.to_string(),
            strftime,
        }
    }

    /// The original token pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Format a timestamp.
    pub fn format(&self, at: &DateTime<Utc>) -> String {
        let mut out = String::new();
        if write!(out, "{}", at.format(&self.strftime)).is_err() {
            return INVALID_DATE.to_string();
        }
        out
    }
}

fn push_literal(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch == '%' {
            out.push_str("%%");
        } else {
            out.push(ch);
        }
    }
}

/// Interpret a cell value as a timestamp.
pub fn parse_date_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        Value::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whether a value counts as "no date": null, empty string, `false` or `0`.
fn is_empty_date(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Render a date cell.
pub fn render_date(value: &Value, format: &DateFormat) -> String {
    if is_empty_date(value) {
        return String::new();
    }
    match parse_date_value(value) {
        Some(at) => format.format(&at),
        None => INVALID_DATE.to_string(),
    }
}
