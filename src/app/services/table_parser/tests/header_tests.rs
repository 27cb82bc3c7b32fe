//! Tests for heuristic header location

use super::super::columns::LabelPredicate;
use super::super::header::{HeaderRules, locate_header};
use crate::app::models::{CellValue, RawGrid};
use crate::config::PipelineConfig;

fn text_row(cells: &[&str]) -> Vec<CellValue> {
    cells
        .iter()
        .map(|c| {
            if c.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(c.to_string())
            }
        })
        .collect()
}

#[test]
fn test_anchor_row_found_within_scan_window() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["Weekly summary", "", ""]),
        text_row(&["", "", ""]),
        text_row(&["Driver", "Route", "Delay, minutes"]),
        text_row(&["Smith J.", "North 14", "25"]),
    ]);
    let rules = HeaderRules::new(LabelPredicate::contains("delay"), 10);

    let span = locate_header(&grid, &rules);

    assert_eq!(span.start_row, 2);
    assert_eq!(span.row_count, 1);
    assert_eq!(span.data_start(), 3);
}

#[test]
fn test_second_row_promoted_when_header_like() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["Delay report", "", ""]),
        text_row(&["Route", "", "Delay"]),
        text_row(&["Number", "Name", "minutes"]),
        text_row(&["14", "North", "25"]),
    ]);
    let rules = HeaderRules::new(LabelPredicate::contains("delay"), 10);

    let span = locate_header(&grid, &rules);

    // first row also mentions the anchor but has too few follow-up cells
    assert_eq!(span.start_row, 1);
    assert_eq!(span.row_count, 2);
    assert_eq!(span.data_start(), 3);
}

#[test]
fn test_second_row_not_promoted_when_numeric() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["Driver", "Route", "Delay"]),
        vec![
            CellValue::Text("Smith J.".to_string()),
            CellValue::Number(14.0),
            CellValue::Number(25.0),
        ],
    ]);
    let rules = HeaderRules::new(LabelPredicate::contains("delay"), 10);

    let span = locate_header(&grid, &rules);

    assert_eq!(span.start_row, 0);
    assert_eq!(span.row_count, 1);
}

#[test]
fn test_second_row_not_promoted_when_sparse() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["Driver", "Route", "Delay"]),
        text_row(&["Smith J.", "", ""]),
        text_row(&["Jones A.", "South 2", "5"]),
    ]);
    let rules = HeaderRules::new(LabelPredicate::contains("delay"), 10);

    let span = locate_header(&grid, &rules);

    assert_eq!(span.row_count, 1);
    assert_eq!(span.data_start(), 1);
}

#[test]
fn test_fallback_to_first_row_when_no_anchor() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["Alpha", "Beta"]),
        text_row(&["1", "2"]),
    ]);
    let rules = HeaderRules::new(LabelPredicate::contains("delay"), 10);

    let span = locate_header(&grid, &rules);

    assert_eq!(span.start_row, 0);
    assert_eq!(span.row_count, 1);
}

#[test]
fn test_anchor_outside_scan_window_ignored() {
    let mut rows: Vec<Vec<CellValue>> = (0..12).map(|_| text_row(&["x", "y", "z"])).collect();
    rows.push(text_row(&["Driver", "Route", "Delay"]));
    let grid = RawGrid::from_rows(rows);
    let rules = HeaderRules::new(LabelPredicate::contains("delay"), 10);

    let span = locate_header(&grid, &rules);

    assert_eq!(span.start_row, 0);
    assert_eq!(span.row_count, 1);
}

#[test]
fn test_docs_anchor_matches_reason_variant_header() {
    // the document anchor keys on the driver marker plus a secondary
    // marker, so a sheet without a waiting-period column still anchors
    let config = PipelineConfig::default();
    let grid = RawGrid::from_rows(vec![
        text_row(&["Document check", "", ""]),
        text_row(&["", "", ""]),
        text_row(&["Driver full name", "TTN number", "TTN incorrectness reason"]),
        vec![
            CellValue::Text("Smith J.".to_string()),
            CellValue::Number(123456.0),
            CellValue::Empty,
        ],
    ]);

    let span = locate_header(&grid, &config.docs.header);

    assert_eq!(span.start_row, 2);
    assert_eq!(span.row_count, 1);
    assert_eq!(span.data_start(), 3);
}

#[test]
fn test_empty_grid_falls_back() {
    let grid = RawGrid::from_rows(vec![]);
    let rules = HeaderRules::new(LabelPredicate::contains("delay"), 10);

    let span = locate_header(&grid, &rules);

    assert_eq!(span.start_row, 0);
    assert_eq!(span.row_count, 1);
}
