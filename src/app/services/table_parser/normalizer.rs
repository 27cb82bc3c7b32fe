//! Table normalization: header flattening and cell value coercion
//!
//! Consumes a [`RawGrid`] and a located [`HeaderSpan`] and produces a
//! [`NormalizedTable`] with flattened column names and normalized cell text.
//! Column and row order are preserved from the source.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::columns::LabelPredicate;
use super::values::{
    clean_waiting_period, coerce_integer_like, normalize_date_cell, normalize_label,
    normalize_text,
};
use crate::app::models::{HeaderSpan, NormalizedTable, RawGrid};
use crate::constants::UNNAMED_PLACEHOLDER_PREFIX;

/// How a two-row header collapses into single column names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderFlattenOptions {
    /// Forward-fill top-level labels across empty/merged cells
    pub forward_fill_top: bool,
    /// Separator between top-level and sub-level labels
    pub joiner: String,
}

impl Default for HeaderFlattenOptions {
    fn default() -> Self {
        Self {
            forward_fill_top: true,
            joiner: " - ".to_string(),
        }
    }
}

/// Designations of columns that receive report-specific value coercion,
/// expressed as predicates over normalized column labels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRules {
    /// Waiting-period/duration columns: zero components stripped
    pub duration_columns: Option<LabelPredicate>,
    /// Date columns: lenient parse, fixed `YYYY-MM-DD` output
    pub date_columns: Option<LabelPredicate>,
    /// Integer-like columns (ticket/route numbers): whole values rendered
    /// without a trailing ".0"
    pub integer_columns: Option<LabelPredicate>,
}

impl ValueRules {
    fn designates(predicate: &Option<LabelPredicate>, normalized_label: &str) -> bool {
        predicate
            .as_ref()
            .map(|p| p.matches(normalized_label))
            .unwrap_or(false)
    }
}

/// Flatten the header span into single column names
///
/// Single-row headers trim cell text verbatim. Two-row headers optionally
/// forward-fill the top level across merged cells, then combine per column:
/// top alone when the sub-level is empty or an "unnamed"-style placeholder,
/// sub alone when the top level is empty, otherwise `<top><joiner><sub>`.
pub fn flatten_header(
    grid: &RawGrid,
    span: HeaderSpan,
    options: &HeaderFlattenOptions,
) -> Vec<String> {
    let top_row = grid.row(span.start_row).unwrap_or_default();
    let mut top: Vec<String> = top_row
        .iter()
        .map(|c| normalize_text(&c.to_display()))
        .collect();

    if span.row_count < 2 {
        return top;
    }

    if options.forward_fill_top {
        let mut carried = String::new();
        for label in &mut top {
            if label.is_empty() {
                label.clone_from(&carried);
            } else {
                carried.clone_from(label);
            }
        }
    }

    let sub_row = grid.row(span.start_row + 1).unwrap_or_default();
    let sub: Vec<String> = sub_row
        .iter()
        .map(|c| normalize_text(&c.to_display()))
        .collect();

    top.iter()
        .enumerate()
        .map(|(index, top_label)| {
            let sub_label = sub.get(index).map(String::as_str).unwrap_or("");
            let placeholder = sub_label.is_empty()
                || sub_label
                    .to_lowercase()
                    .starts_with(UNNAMED_PLACEHOLDER_PREFIX);
            if placeholder {
                top_label.clone()
            } else if top_label.is_empty() {
                sub_label.to_string()
            } else {
                format!("{top_label}{}{sub_label}", options.joiner)
            }
        })
        .collect()
}

/// Produce a normalized table from a grid and its located header
///
/// Applies text normalization to every cell, the configured per-column
/// coercions, and drops rows that are fully empty after normalization.
pub fn normalize_table(
    grid: &RawGrid,
    span: HeaderSpan,
    flatten: &HeaderFlattenOptions,
    rules: &ValueRules,
) -> NormalizedTable {
    let columns = flatten_header(grid, span, flatten);
    let normalized_labels: Vec<String> = columns.iter().map(|c| normalize_label(c)).collect();

    let mut rows = Vec::new();
    for row_index in span.data_start()..grid.row_count() {
        let raw_row = grid.row(row_index).unwrap_or_default();
        let mut row: Vec<String> = Vec::with_capacity(columns.len());
        for column_index in 0..columns.len() {
            let cell = raw_row.get(column_index).cloned().unwrap_or_default();
            let mut value = normalize_text(&cell.to_display());
            let label = &normalized_labels[column_index];
            if ValueRules::designates(&rules.duration_columns, label) {
                value = clean_waiting_period(&value);
            } else if ValueRules::designates(&rules.date_columns, label) {
                value = normalize_date_cell(&value);
            } else if ValueRules::designates(&rules.integer_columns, label) {
                value = coerce_integer_like(&value);
            }
            row.push(value);
        }
        if row.iter().all(|v| v.is_empty()) {
            continue;
        }
        rows.push(row);
    }

    debug!(
        columns = columns.len(),
        rows = rows.len(),
        "normalized table"
    );
    NormalizedTable { columns, rows }
}
