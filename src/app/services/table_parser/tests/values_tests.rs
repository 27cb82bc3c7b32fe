//! Tests for cell value normalization helpers

use super::super::values::{
    clean_time, clean_waiting_period, coerce_integer_like, normalize_date_cell, normalize_label,
    normalize_text, parse_lenient_date,
};

#[test]
fn test_normalize_text_collapses_whitespace() {
    assert_eq!(normalize_text("  Smith\u{a0} J.  "), "Smith J.");
    assert_eq!(normalize_text("a\t b\n c"), "a b c");
    assert_eq!(normalize_text(""), "");
}

#[test]
fn test_normalize_label_lowercases_and_strips_dots() {
    assert_eq!(normalize_label("Vehicle Plate No."), "vehicle plate no");
    assert_eq!(normalize_label("  DELAY,  Minutes "), "delay, minutes");
}

#[test]
fn test_waiting_period_zero_components_removed() {
    assert_eq!(
        clean_waiting_period("5 days, 0 hours, 0 minutes, 0 seconds"),
        "5 days"
    );
    assert_eq!(
        clean_waiting_period("0 days, 3 hours, 0 minutes"),
        "0 days, 3 hours"
    );
    assert_eq!(clean_waiting_period("2 hours, 15 minutes"), "2 hours, 15 minutes");
}

#[test]
fn test_waiting_period_all_zero_becomes_empty() {
    assert_eq!(clean_waiting_period("0 hours, 0 minutes, 0 seconds"), "");
    assert_eq!(clean_waiting_period("00:00:00"), "");
    assert_eq!(clean_waiting_period(""), "");
}

#[test]
fn test_parse_lenient_date_iso_first() {
    // 01/02 resolves as the 1st of February only when ISO forms fail
    let iso = parse_lenient_date("2024-02-01").unwrap();
    assert_eq!(iso.format("%Y-%m-%d").to_string(), "2024-02-01");

    let dayfirst = parse_lenient_date("01.02.2024").unwrap();
    assert_eq!(dayfirst.format("%Y-%m-%d").to_string(), "2024-02-01");
}

#[test]
fn test_parse_lenient_date_with_time() {
    let parsed = parse_lenient_date("2024-02-01 08:30:00").unwrap();
    assert_eq!(parsed.format("%Y-%m-%d").to_string(), "2024-02-01");
}

#[test]
fn test_normalize_date_cell_unparseable_is_empty() {
    assert_eq!(normalize_date_cell("not a date"), "");
    assert_eq!(normalize_date_cell(""), "");
    assert_eq!(normalize_date_cell("15.03.2024"), "2024-03-15");
}

#[test]
fn test_coerce_integer_like_strips_trailing_point_zero() {
    assert_eq!(coerce_integer_like("12345.0"), "12345");
    assert_eq!(coerce_integer_like("12345"), "12345");
    assert_eq!(coerce_integer_like("nan"), "");
    assert_eq!(coerce_integer_like(""), "");
    // non-numeric text passes through untouched
    assert_eq!(coerce_integer_like("AB-104"), "AB-104");
}

#[test]
fn test_clean_time_extracts_hh_mm() {
    assert_eq!(clean_time("08:30:00"), "08:30");
    assert_eq!(clean_time("shift starts 07:15"), "07:15");
    assert_eq!(clean_time("nan"), "");
    assert_eq!(clean_time("none"), "");
    // text without a clock pattern passes through
    assert_eq!(clean_time("by agreement"), "by agreement");
}
