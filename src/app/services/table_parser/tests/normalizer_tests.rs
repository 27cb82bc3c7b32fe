//! Tests for header flattening and table normalization

use super::super::columns::LabelPredicate;
use super::super::normalizer::{HeaderFlattenOptions, ValueRules, flatten_header, normalize_table};
use crate::app::models::{CellValue, HeaderSpan, RawGrid};

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

fn space_join_no_fill() -> HeaderFlattenOptions {
    HeaderFlattenOptions {
        forward_fill_top: false,
        joiner: " ".to_string(),
    }
}

#[test]
fn test_flatten_single_row_header() {
    let grid = RawGrid::from_rows(vec![text_row(&[" Driver ", "Route", "Delay"])]);
    let columns = flatten_header(&grid, HeaderSpan::single(0), &HeaderFlattenOptions::default());

    assert_eq!(columns, vec!["Driver", "Route", "Delay"]);
}

#[test]
fn test_flatten_two_row_header_space_join() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["Route", "", "Delay"]),
        text_row(&["Number", "Name", "minutes"]),
    ]);
    let columns = flatten_header(&grid, HeaderSpan::double(0), &space_join_no_fill());

    assert_eq!(columns, vec!["Route Number", "Name", "Delay minutes"]);
}

#[test]
fn test_flatten_forward_fills_merged_top_cells() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["Arrival", "", "Driver"]),
        text_row(&["Planned", "Actual", ""]),
    ]);
    let columns = flatten_header(&grid, HeaderSpan::double(0), &HeaderFlattenOptions::default());

    assert_eq!(
        columns,
        vec!["Arrival - Planned", "Arrival - Actual", "Driver"]
    );
}

#[test]
fn test_flatten_unnamed_placeholder_collapses_to_top() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["Driver", "Route"]),
        text_row(&["Unnamed: 0_level_1", "Name"]),
    ]);
    let columns = flatten_header(&grid, HeaderSpan::double(0), &HeaderFlattenOptions::default());

    assert_eq!(columns, vec!["Driver", "Route - Name"]);
}

#[test]
fn test_flatten_is_deterministic() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["Route", "", "Delay"]),
        text_row(&["Number", "Name", "minutes"]),
    ]);
    let options = space_join_no_fill();

    let first = flatten_header(&grid, HeaderSpan::double(0), &options);
    let second = flatten_header(&grid, HeaderSpan::double(0), &options);

    assert_eq!(first, second);
}

#[test]
fn test_normalize_table_applies_value_rules() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["TTN number", "TTN date", "Waiting period"]),
        text_row(&["123456.0", "15.03.2024", "5 days, 0 hours, 0 minutes"]),
        text_row(&["", "", ""]),
    ]);
    let rules = ValueRules {
        duration_columns: Some(LabelPredicate::contains("waiting period")),
        date_columns: Some(LabelPredicate::all_tokens(&["ttn", "date"])),
        integer_columns: Some(LabelPredicate::all_tokens(&["ttn", "number"])),
    };

    let table = normalize_table(
        &grid,
        HeaderSpan::single(0),
        &HeaderFlattenOptions::default(),
        &rules,
    );

    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0], vec!["123456", "2024-03-15", "5 days"]);
}

#[test]
fn test_normalize_table_drops_empty_rows_only() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["Driver", "Delay"]),
        text_row(&["Smith J.", "25"]),
        text_row(&["", ""]),
        text_row(&["Jones A.", ""]),
    ]);

    let table = normalize_table(
        &grid,
        HeaderSpan::single(0),
        &HeaderFlattenOptions::default(),
        &ValueRules::default(),
    );

    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1], vec!["Jones A.", ""]);
}

#[test]
fn test_normalize_table_preserves_column_and_row_order() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["B", "A"]),
        text_row(&["2", "1"]),
        text_row(&["4", "3"]),
    ]);

    let table = normalize_table(
        &grid,
        HeaderSpan::single(0),
        &HeaderFlattenOptions::default(),
        &ValueRules::default(),
    );

    assert_eq!(table.columns, vec!["B", "A"]);
    assert_eq!(table.rows[0], vec!["2", "1"]);
    assert_eq!(table.rows[1], vec!["4", "3"]);
}

#[test]
fn test_normalize_table_short_rows_padded() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["Driver", "Route", "Delay"]),
        text_row(&["Smith J."]),
    ]);

    let table = normalize_table(
        &grid,
        HeaderSpan::single(0),
        &HeaderFlattenOptions::default(),
        &ValueRules::default(),
    );

    assert_eq!(table.rows[0], vec!["Smith J.", "", ""]);
}

#[test]
fn test_column_index_lookup() {
    let grid = RawGrid::from_rows(vec![
        text_row(&["Driver", "Delay"]),
        text_row(&["Smith J.", "25"]),
    ]);

    let table = normalize_table(
        &grid,
        HeaderSpan::single(0),
        &HeaderFlattenOptions::default(),
        &ValueRules::default(),
    );

    assert_eq!(table.column_index("Delay"), Some(1));
    assert_eq!(table.value(0, "Delay"), "25");
    assert_eq!(table.value(0, "Missing"), "");
    assert_eq!(table.value(9, "Delay"), "");
}
