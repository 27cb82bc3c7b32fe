//! Tests for report classification and record extraction

pub mod detect_tests;

use crate::app::models::NormalizedTable;

/// Build a normalized table literal for extraction tests
pub fn table(columns: &[&str], rows: &[&[&str]]) -> NormalizedTable {
    NormalizedTable {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect(),
    }
}
