//! Pure value-normalization helpers
//!
//! Text, label, duration, date and integer normalization used by the table
//! normalizer. All functions are pure and independently unit-testable.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

use crate::constants::{DATE_INPUT_FORMATS, DATE_OUTPUT_FORMAT};

const NBSP: char = '\u{a0}';

/// Normalize cell text: trim, NBSP to space, collapse whitespace runs
pub fn normalize_text(value: &str) -> String {
    let replaced = value.replace(NBSP, " ");
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a column label for matching: lowercase on top of the text
/// normalization, with trailing periods stripped
pub fn normalize_label(label: &str) -> String {
    let lowered = label.to_lowercase().replace(NBSP, " ");
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_end_matches('.').trim().to_string()
}

static ZERO_DURATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Zero components with a leading separator
        r"(?i),?\s*\b0\s*(?:hours?|hrs?|h)\.?(?:\b|$)",
        r"(?i),?\s*\b0\s*(?:minutes?|mins?|min)\.?(?:\b|$)",
        r"(?i),?\s*\b0\s*(?:seconds?|secs?|sec)\.?(?:\b|$)",
        // Zero components with a trailing separator
        r"(?i)\b0\s*(?:hours?|hrs?|h)\.?\s*,?(?:\b|\s|$)",
        r"(?i)\b0\s*(?:minutes?|mins?|min)\.?\s*,?(?:\b|\s|$)",
        r"(?i)\b0\s*(?:seconds?|secs?|sec)\.?(?:\b|\s|$)",
        // Clock-style and bare zero triples
        r"\s*0+:0+:0+\s*",
        r"\s*\b0\s*,\s*0\s*,\s*0\b\s*",
        r"\s*\b0\s+0\s+0\b\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

static COMMA_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*,+").expect("static regex"));
static LEADING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^,\s*").expect("static regex"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*$").expect("static regex"));

/// Strip zero-valued duration components from a waiting-period value
///
/// `"5 days, 0 hours, 0 minutes, 0 seconds"` becomes `"5 days"`;
/// a value of only zero components collapses to the empty string.
pub fn clean_waiting_period(value: &str) -> String {
    let mut text = value.to_string();
    for pattern in ZERO_DURATION_PATTERNS.iter() {
        text = pattern.replace_all(&text, " ").into_owned();
    }
    text = COMMA_RUNS.replace_all(&text, ",").into_owned();
    text = LEADING_COMMA.replace_all(&text, "").into_owned();
    text = TRAILING_COMMA.replace_all(&text, "").into_owned();
    normalize_text(&text)
}

/// Parse a date leniently: ISO formats first, then day-first formats
pub fn parse_lenient_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_INPUT_FORMATS {
        if format.contains("%H") {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Some(dt.date());
            }
        } else if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

/// Normalize a designated date cell to `YYYY-MM-DD`, or empty if unparseable
///
/// A parse failure must never fabricate a date; the explicit empty string is
/// the only degraded form.
pub fn normalize_date_cell(value: &str) -> String {
    parse_lenient_date(value)
        .map(|d| d.format(DATE_OUTPUT_FORMAT).to_string())
        .unwrap_or_default()
}

static TRAILING_POINT_ZEROS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.0+$").expect("static regex"));

/// Coerce an integer-like cell (ticket/route numbers) to a clean integer
/// rendering, preserving the original text for non-whole values
pub fn coerce_integer_like(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return String::new();
    }
    if let Ok(number) = trimmed.parse::<f64>() {
        if number.is_finite() && number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
            return format!("{}", number as i64);
        }
    }
    TRAILING_POINT_ZEROS.replace(trimmed, "").into_owned()
}

/// Reduce a time-bearing cell to `HH:MM`, passing other text through
pub fn clean_time(value: &str) -> String {
    static CLOCK: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(\d{2}:\d{2})").expect("static regex"));
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") || trimmed.eq_ignore_ascii_case("none")
    {
        return String::new();
    }
    match CLOCK.captures(trimmed) {
        Some(caps) => caps[1].to_string(),
        None => trimmed.to_string(),
    }
}
