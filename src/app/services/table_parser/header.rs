//! Header location in raw, headerless grids
//!
//! Scans a bounded prefix of the grid for a row matching a report-specific
//! anchor predicate, then decides whether the header spans one or two
//! physical rows. When no anchor is found the locator degrades to row 0 and
//! lets downstream column resolution fail explicitly rather than silently
//! mis-parsing.

use tracing::{debug, warn};

use super::columns::LabelPredicate;
use super::values::normalize_label;
use crate::app::models::{CellValue, HeaderSpan, RawGrid};
use crate::constants::{HEADER_LIKE_TEXT_RATIO, SECOND_HEADER_MIN_CELLS};

/// Rules for locating one report family's header
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HeaderRules {
    /// Predicate over the joined, normalized text of a candidate row
    pub anchor: LabelPredicate,
    /// Scan bound capping the cost of the search
    pub scan_rows: usize,
}

impl HeaderRules {
    pub fn new(anchor: LabelPredicate, scan_rows: usize) -> Self {
        Self { anchor, scan_rows }
    }
}

/// Locate the header span of a grid
///
/// The first row within the scan bound whose joined normalized text
/// satisfies the anchor is the header start. Row r+1 is promoted into the
/// span when it has at least [`SECOND_HEADER_MIN_CELLS`] non-empty cells and
/// looks header-like; otherwise the header is row r alone.
pub fn locate_header(grid: &RawGrid, rules: &HeaderRules) -> HeaderSpan {
    let bound = rules.scan_rows.min(grid.row_count());
    for row_index in 0..bound {
        let row = grid.row(row_index).unwrap_or_default();
        if !rules.anchor.matches(&joined_row_text(row)) {
            continue;
        }
        debug!(row = row_index, "found header anchor row");

        if let Some(next_row) = grid.row(row_index + 1) {
            let non_empty = next_row.iter().filter(|c| !c.is_empty()).count();
            if non_empty >= SECOND_HEADER_MIN_CELLS && is_header_like(next_row) {
                debug!(
                    row = row_index + 1,
                    non_empty, "promoting second header row"
                );
                return HeaderSpan::double(row_index);
            }
        }
        return HeaderSpan::single(row_index);
    }

    warn!(
        scanned = bound,
        "header anchor not found, degrading to row 0"
    );
    HeaderSpan::single(0)
}

/// Whether a row looks like header titles rather than data
///
/// At least [`HEADER_LIKE_TEXT_RATIO`] of its non-empty cells must be
/// textual (not numeric or date typed).
pub fn is_header_like(row: &[CellValue]) -> bool {
    let non_empty: Vec<&CellValue> = row.iter().filter(|c| !c.is_empty()).collect();
    if non_empty.is_empty() {
        return false;
    }
    let text_like = non_empty.iter().filter(|c| c.is_text()).count();
    text_like as f64 / non_empty.len() as f64 >= HEADER_LIKE_TEXT_RATIO
}

/// Join a row's cells into one normalized text blob for anchor matching
pub fn joined_row_text(row: &[CellValue]) -> String {
    let parts: Vec<String> = row
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| normalize_label(&c.to_display()))
        .collect();
    parts.join(" ")
}
