//! Shift assignment extraction
//!
//! Shift sheets are the most irregular of the three report families: the
//! assignment date often lives in a title cell rather than a column, time
//! cells mix clock strings with serial-backed values, and exports repeat
//! the header labels between blocks of rows.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, warn};

use crate::app::models::{CellValue, NormalizedTable, RawGrid, ShiftRecord};
use crate::app::services::table_parser::ColumnResolver;
use crate::app::services::table_parser::columns::canonical;
use crate::app::services::table_parser::values::{clean_time, normalize_label, parse_lenient_date};
use crate::config::ReportProfile;
use crate::constants::{DATE_OUTPUT_FORMAT, SHIFT_DATE_SCAN_ROWS};
use crate::Result;

/// Column tokens that must all be present for a table to be a shift sheet
const SHIFT_MARKER_TOKENS: &[&[&str]] = &[
    &["route"],
    &["shift", "date"],
    &["assigned"],
    &["departure"],
    &["delay"],
    &["full", "name"],
    &["plate"],
];

/// Driver-cell texts that mark a repeated header row rather than data
const HEADER_ECHO_TOKENS: &[&str] = &["driver", "full name"];

/// True when the flattened columns carry the full shift sheet vocabulary
///
/// The conjunction is deliberately strict: shift sheets share tokens with
/// delay reports, and a partial match must not divert a delay report into
/// the sync path.
pub fn is_shift_table(columns: &[String]) -> bool {
    let normalized: Vec<String> = columns.iter().map(|c| normalize_label(c)).collect();
    SHIFT_MARKER_TOKENS.iter().all(|tokens| {
        normalized
            .iter()
            .any(|label| tokens.iter().all(|token| label.contains(token)))
    })
}

/// Extract shift records from a shift sheet
///
/// The assignment date is recovered from the sheet prefix or the filename
/// when the date column is absent; without any date source the sheet is
/// skipped rather than failed, matching its best-effort role. Row-level
/// date cells override the sheet date.
pub fn extract_shifts(
    grid: &RawGrid,
    table: &NormalizedTable,
    profile: &ReportProfile,
    filename: &str,
) -> Result<Vec<ShiftRecord>> {
    let sheet_date = match sheet_date(grid, filename) {
        Some(date) => date,
        None => {
            warn!(filename, "no assignment date found in shift sheet");
            return Ok(Vec::new());
        }
    };

    let resolver = ColumnResolver::new(profile.columns.clone());
    let map = resolver.resolve(&table.columns);
    if map.get(canonical::DRIVER_NAME).is_none()
        || (map.get(canonical::ROUTE_NAME).is_none() && map.get(canonical::ROUTE_NUMBER).is_none())
    {
        debug!(filename, "shift sheet columns not mapped");
        return Ok(Vec::new());
    }

    let value = |key: &str, row: usize| -> String {
        map.get(key)
            .map(|label| table.value(row, label).trim().to_string())
            .unwrap_or_default()
    };

    let mut records = Vec::new();
    for row_index in 0..table.rows.len() {
        let driver_name = value(canonical::DRIVER_NAME, row_index);
        if driver_name.is_empty() || is_header_echo(&driver_name) {
            continue;
        }

        let route_name = value(canonical::ROUTE_NAME, row_index);
        let route_number = value(canonical::ROUTE_NUMBER, row_index);
        if route_name.is_empty() && route_number.is_empty() {
            continue;
        }

        let row_date = parse_lenient_date(&value(canonical::SHIFT_DATE, row_index));
        let shift_date = row_date.unwrap_or(sheet_date);

        records.push(ShiftRecord {
            driver_name,
            plate_number: value(canonical::PLATE, row_index),
            route_name,
            route_number,
            shift_date: shift_date.format(DATE_OUTPUT_FORMAT).to_string(),
            planned_time: clean_time(&value(canonical::PLANNED_TIME, row_index)),
            assigned_time: clean_time(&value(canonical::ASSIGNED_TIME, row_index)),
            departure_time: clean_time(&value(canonical::DEPARTURE_TIME, row_index)),
            delay_minutes: parse_optional_minutes(&value(canonical::DELAY, row_index)),
        });
    }

    debug!(filename, records = records.len(), "extracted shift records");
    Ok(records)
}

fn is_header_echo(driver_name: &str) -> bool {
    let lowered = driver_name.to_lowercase();
    HEADER_ECHO_TOKENS.iter().any(|token| lowered == *token)
}

fn parse_optional_minutes(value: &str) -> Option<i64> {
    let cleaned = value.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().map(|minutes| minutes as i64)
}

static DOTTED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})\.(\d{2})\.(\d{4})").expect("static regex"));
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("static regex"));

/// Assignment date from the sheet prefix, falling back to the filename
fn sheet_date(grid: &RawGrid, filename: &str) -> Option<NaiveDate> {
    for row_index in 0..grid.row_count().min(SHIFT_DATE_SCAN_ROWS) {
        for cell in grid.row(row_index).unwrap_or_default() {
            match cell {
                CellValue::DateTime(dt) => return Some(dt.date()),
                CellValue::Text(text) => {
                    if let Some(date) = date_in_text(text) {
                        return Some(date);
                    }
                }
                _ => {}
            }
        }
    }
    date_in_text(filename)
}

fn date_in_text(text: &str) -> Option<NaiveDate> {
    if let Some(found) = DOTTED_DATE.find(text) {
        if let Ok(date) = NaiveDate::parse_from_str(found.as_str(), "%d.%m.%Y") {
            return Some(date);
        }
    }
    if let Some(found) = ISO_DATE.find(text) {
        if let Ok(date) = NaiveDate::parse_from_str(found.as_str(), "%Y-%m-%d") {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{date_in_text, is_header_echo, parse_optional_minutes};

    #[test]
    fn test_date_in_text() {
        assert_eq!(
            date_in_text("Shift assignments 05.03.2024.xlsx")
                .unwrap()
                .format("%Y-%m-%d")
                .to_string(),
            "2024-03-05"
        );
        assert_eq!(
            date_in_text("export 2024-03-05 final")
                .unwrap()
                .format("%Y-%m-%d")
                .to_string(),
            "2024-03-05"
        );
        assert!(date_in_text("no dates here").is_none());
    }

    #[test]
    fn test_header_echo_detection() {
        assert!(is_header_echo("Driver"));
        assert!(is_header_echo("FULL NAME"));
        assert!(!is_header_echo("Smith J."));
    }

    #[test]
    fn test_optional_minutes() {
        assert_eq!(parse_optional_minutes("12"), Some(12));
        assert_eq!(parse_optional_minutes("12,5"), Some(12));
        assert_eq!(parse_optional_minutes(""), None);
        assert_eq!(parse_optional_minutes("x"), None);
    }
}
