//! Delay record extraction

use tracing::{debug, info};

use crate::app::models::{LateRecord, NormalizedTable};
use crate::app::services::table_parser::ColumnResolver;
use crate::app::services::table_parser::columns::canonical;
use crate::config::ReportProfile;
use crate::constants::FIELD_PLACEHOLDER;
use crate::{Error, Result};

/// Extract delay records from a normalized delay report table
///
/// The delay column is the only required one; its absence is an error so
/// the attachment can be retried after a vocabulary fix. Rows whose delay
/// is unparseable or not positive are skipped, and missing optional fields
/// degrade to the placeholder. Output is sorted by descending delay; ties
/// keep their row order.
pub fn extract_late(
    table: &NormalizedTable,
    profile: &ReportProfile,
    attachment: &str,
) -> Result<Vec<LateRecord>> {
    let resolver = ColumnResolver::new(profile.columns.clone());
    let map = resolver.resolve(&table.columns);

    let delay_column = map
        .get(canonical::DELAY)
        .ok_or_else(|| Error::required_column_missing(attachment, canonical::DELAY))?
        .to_string();

    let mut records = Vec::new();
    for row_index in 0..table.rows.len() {
        let delay_minutes = match parse_delay(table.value(row_index, &delay_column)) {
            Some(minutes) if minutes > 0 => minutes,
            _ => continue,
        };

        let field = |key: &str| -> String {
            let value = map
                .get(key)
                .map(|label| table.value(row_index, label))
                .unwrap_or("");
            if value.trim().is_empty() {
                FIELD_PLACEHOLDER.to_string()
            } else {
                value.trim().to_string()
            }
        };

        records.push(LateRecord {
            driver_name: field(canonical::DRIVER_NAME),
            plate_number: field(canonical::PLATE).to_uppercase(),
            route_name: field(canonical::ROUTE_NAME),
            planned_time: field(canonical::PLANNED_TIME),
            assigned_time: field(canonical::ASSIGNED_TIME),
            delay_minutes,
        });
    }

    records.sort_by(|a, b| b.delay_minutes.cmp(&a.delay_minutes));

    if records.is_empty() {
        info!(attachment, "no positive delays in delay report");
    } else {
        debug!(attachment, records = records.len(), "extracted delay records");
    }
    Ok(records)
}

/// Parse a delay cell into whole minutes
///
/// Decimal commas are accepted; fractional minutes round toward zero the
/// way the upstream export truncates them.
fn parse_delay(value: &str) -> Option<i64> {
    let cleaned = value.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().map(|minutes| minutes as i64)
}

#[cfg(test)]
mod tests {
    use super::parse_delay;

    #[test]
    fn test_parse_delay_variants() {
        assert_eq!(parse_delay("25"), Some(25));
        assert_eq!(parse_delay("25.0"), Some(25));
        assert_eq!(parse_delay("25,7"), Some(25));
        assert_eq!(parse_delay("-3"), Some(-3));
        assert_eq!(parse_delay(""), None);
        assert_eq!(parse_delay("late"), None);
    }
}
