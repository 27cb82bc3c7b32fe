//! Column-based report family classification

use tracing::debug;

use crate::app::models::ReportType;
use crate::app::services::table_parser::values::normalize_label;
use crate::config::DetectionRules;

/// Classify a table by its flattened column labels
///
/// Classification never reads cell data or filenames; the columns alone
/// decide. Delay reports are checked first so a table carrying both
/// vocabularies lands in the delay family.
pub fn detect_report_type(columns: &[String], rules: &DetectionRules) -> ReportType {
    let normalized: Vec<String> = columns.iter().map(|c| normalize_label(c)).collect();

    let report_type = if rules.is_late(&normalized) {
        ReportType::Late
    } else if rules.is_docs(&normalized) {
        ReportType::Docs
    } else {
        ReportType::Unknown
    };
    debug!(%report_type, columns = columns.len(), "classified table");
    report_type
}
