//! Tests for report family detection

use super::super::detect_report_type;
use crate::app::models::ReportType;
use crate::config::PipelineConfig;

fn columns(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|l| l.to_string()).collect()
}

#[test]
fn test_late_report_detected() {
    let config = PipelineConfig::default();
    let labels = columns(&[
        "Driver full name",
        "Vehicle plate",
        "Route name",
        "Delay, minutes",
    ]);

    assert_eq!(
        detect_report_type(&labels, &config.detection),
        ReportType::Late
    );
}

#[test]
fn test_docs_report_detected() {
    let config = PipelineConfig::default();
    let labels = columns(&["Driver full name", "TTN number", "Waiting period"]);

    assert_eq!(
        detect_report_type(&labels, &config.detection),
        ReportType::Docs
    );
}

#[test]
fn test_late_detected_without_driver_column() {
    // the delay column alone decides; extraction backfills missing
    // fields with placeholders
    let config = PipelineConfig::default();
    let labels = columns(&["Route Name", "Plate Number", "Delay, minutes"]);

    assert_eq!(
        detect_report_type(&labels, &config.detection),
        ReportType::Late
    );
}

#[test]
fn test_docs_detected_by_reason_column() {
    let config = PipelineConfig::default();
    let labels = columns(&["TTN incorrectness reason", "TTN number"]);

    assert_eq!(
        detect_report_type(&labels, &config.detection),
        ReportType::Docs
    );
}

#[test]
fn test_docs_detected_by_waiting_column() {
    let config = PipelineConfig::default();
    let labels = columns(&["Waiting period", "Route number"]);

    assert_eq!(
        detect_report_type(&labels, &config.detection),
        ReportType::Docs
    );
}

#[test]
fn test_driver_column_alone_is_unknown() {
    // a driver column carries no family vocabulary on its own
    let config = PipelineConfig::default();
    let labels = columns(&["Driver full name", "Comment"]);

    assert_eq!(
        detect_report_type(&labels, &config.detection),
        ReportType::Unknown
    );
}

#[test]
fn test_late_wins_over_docs_when_both_match() {
    let config = PipelineConfig::default();
    let labels = columns(&["Driver full name", "Delay, minutes", "TTN number"]);

    assert_eq!(
        detect_report_type(&labels, &config.detection),
        ReportType::Late
    );
}

#[test]
fn test_unrelated_table_is_unknown() {
    let config = PipelineConfig::default();
    let labels = columns(&["Region", "Revenue", "Quarter"]);

    assert_eq!(
        detect_report_type(&labels, &config.detection),
        ReportType::Unknown
    );
}

#[test]
fn test_detection_reads_labels_not_filenames() {
    // the label set decides even when it arrives from an oddly named file
    let config = PipelineConfig::default();
    let labels = columns(&["route", "DELAY (min)"]);

    assert_eq!(
        detect_report_type(&labels, &config.detection),
        ReportType::Late
    );
}
