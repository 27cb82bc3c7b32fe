//! Data models for report extraction
//!
//! Core data structures for raw spreadsheet grids, located headers,
//! normalized tables and the typed records the extractors emit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::DATE_OUTPUT_FORMAT;

// =============================================================================
// Raw Grid
// =============================================================================

/// A single decoded cell value, before any header is assumed
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// True for blank cells and whitespace-only text
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => {
                let t = s.trim();
                t.is_empty() || t.eq_ignore_ascii_case("nan")
            }
            _ => false,
        }
    }

    /// True when the cell carries textual content (used by the header-like test)
    pub fn is_text(&self) -> bool {
        matches!(self, CellValue::Text(s) if !s.trim().is_empty())
    }

    /// Render the cell as display text without report-specific normalization
    ///
    /// Whole numbers render without a trailing ".0". Date-times with a
    /// midnight time render as a plain date; sub-day serials (pure times of
    /// day) render as `HH:MM`.
    pub fn to_display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => {
                use chrono::Timelike;
                let time = dt.time();
                if dt.date() == excel_epoch() {
                    // Sub-day serial: a time of day with no date component
                    format!("{:02}:{:02}", time.hour(), time.minute())
                } else if time.hour() == 0 && time.minute() == 0 && time.second() == 0 {
                    dt.date().format(DATE_OUTPUT_FORMAT).to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M").to_string()
                }
            }
        }
    }
}

/// Anchor date of the 1900 Excel serial system
pub fn excel_epoch() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(1899, 12, 30).expect("static date")
}

/// An ordered, rectangular grid of untyped cell values
///
/// Invariant: every row has the same column count; short rows are
/// right-padded with [`CellValue::Empty`] by the decoder.
#[derive(Debug, Clone, Default)]
pub struct RawGrid {
    pub rows: Vec<Vec<CellValue>>,
}

impl RawGrid {
    /// Build a grid from rows, right-padding to a rectangle
    pub fn from_rows(mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }
}

/// The grid rows identified as containing column titles rather than data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSpan {
    pub start_row: usize,
    /// 1 for a plain header, 2 for a merged two-row header
    pub row_count: usize,
}

impl HeaderSpan {
    pub fn single(start_row: usize) -> Self {
        Self {
            start_row,
            row_count: 1,
        }
    }

    pub fn double(start_row: usize) -> Self {
        Self {
            start_row,
            row_count: 2,
        }
    }

    /// First data row below the header
    pub fn data_start(&self) -> usize {
        self.start_row + self.row_count
    }
}

// =============================================================================
// Normalized Table
// =============================================================================

/// A table after header flattening and cell normalization
///
/// Column and row order are preserved from the source.
#[derive(Debug, Clone, Default)]
pub struct NormalizedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    /// Index of the column with the given (original, non-normalized) label
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// Cell value at (row, column-label), empty string when absent
    pub fn value(&self, row: usize, label: &str) -> &str {
        self.column_index(label)
            .and_then(|ci| self.rows.get(row).and_then(|r| r.get(ci)))
            .map(String::as_str)
            .unwrap_or("")
    }
}

// =============================================================================
// Report Classification
// =============================================================================

/// Classification of a table based on which canonical columns it contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Delivery delay report
    Late,
    /// Outstanding documents report
    Docs,
    /// Columns match no known report family
    Unknown,
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportType::Late => write!(f, "late"),
            ReportType::Docs => write!(f, "docs"),
            ReportType::Unknown => write!(f, "unknown"),
        }
    }
}

// =============================================================================
// Typed Records
// =============================================================================

/// One delivery delay event, extracted from a delay report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateRecord {
    pub driver_name: String,
    pub plate_number: String,
    pub route_name: String,
    pub planned_time: String,
    pub assigned_time: String,
    pub delay_minutes: i64,
}

impl LateRecord {
    /// Composite natural key used for cross-file deduplication
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.driver_name.trim().to_string(),
            self.route_name.trim().to_string(),
            self.planned_time.trim().to_string(),
        )
    }
}

/// One outstanding-document wait, extracted from a document report row
///
/// `fields` retains every normalized column in table order; administrative
/// columns are dropped only at render time so dedup keys stay derivable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRecord {
    pub driver_name: String,
    pub ttn_number: String,
    pub ttn_date: String,
    pub route_number: String,
    pub waiting_period: String,
    pub fields: Vec<(String, String)>,
}

impl DocRecord {
    /// Composite natural key used for cross-file deduplication
    pub fn dedup_key(&self) -> (String, String, String, String) {
        (
            self.ttn_number.clone(),
            self.ttn_date.clone(),
            self.driver_name.trim().to_string(),
            self.route_number.clone(),
        )
    }

    /// Leading surname, used to order per-driver deliveries
    pub fn surname(&self) -> &str {
        self.driver_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
    }
}

/// One shift assignment row, synced to the downstream API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub driver_name: String,
    pub plate_number: String,
    pub route_name: String,
    pub route_number: String,
    pub shift_date: String,
    pub planned_time: String,
    pub assigned_time: String,
    pub departure_time: String,
    pub delay_minutes: Option<i64>,
}

impl ShiftRecord {
    /// Whole-record composite key: any field difference is a distinct shift
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}|{}|{}",
            self.shift_date,
            self.driver_name,
            self.route_name,
            self.route_number,
            self.plate_number,
            self.planned_time,
            self.assigned_time,
            self.departure_time,
            self.delay_minutes.map(|d| d.to_string()).unwrap_or_default()
        )
    }
}

// =============================================================================
// Attachments
// =============================================================================

/// A spreadsheet attachment with its logical source identity
///
/// `message_id` and `position` come from the mail-retrieval collaborator;
/// together with the content hash they form the idempotency ledger key.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub message_id: String,
    pub position: usize,
    pub filename: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(
        message_id: impl Into<String>,
        position: usize,
        filename: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            position,
            filename: filename.into(),
            data,
        }
    }

    /// Stable ledger key: message id, position within message, content hash
    ///
    /// Byte-identical content at the same position is recognized across
    /// pipeline changes; changed content at the same position is new.
    pub fn ledger_key(&self) -> String {
        let digest = Sha256::digest(&self.data);
        format!("{}:{}:{:x}", self.message_id, self.position, digest)
    }

    /// Short form of the ledger key for log lines
    pub fn short_key(&self) -> String {
        let key = self.ledger_key();
        key.chars().take(20).collect::<String>() + "..."
    }
}
