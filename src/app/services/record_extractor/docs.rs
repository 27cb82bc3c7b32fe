//! Outstanding document record extraction

use tracing::debug;

use crate::app::models::{DocRecord, NormalizedTable};
use crate::app::services::table_parser::ColumnResolver;
use crate::app::services::table_parser::columns::canonical;
use crate::config::ReportProfile;
use crate::{Error, Result};

/// Extract document records from a normalized document report table
///
/// The driver column is required; everything else degrades to empty. Every
/// normalized column is retained on the record in table order so that
/// rendering can drop administrative columns without losing the dedup key
/// inputs. Rows without a driver name are skipped.
pub fn extract_docs(
    table: &NormalizedTable,
    profile: &ReportProfile,
    attachment: &str,
) -> Result<Vec<DocRecord>> {
    let resolver = ColumnResolver::new(profile.columns.clone());
    let map = resolver.resolve(&table.columns);

    let driver_column = map
        .get(canonical::DRIVER_NAME)
        .ok_or_else(|| Error::required_column_missing(attachment, canonical::DRIVER_NAME))?
        .to_string();

    let resolved = |key: &str, row: usize| -> String {
        map.get(key)
            .map(|label| table.value(row, label).trim().to_string())
            .unwrap_or_default()
    };

    let mut records = Vec::new();
    for row_index in 0..table.rows.len() {
        let driver_name = table.value(row_index, &driver_column).trim().to_string();
        if driver_name.is_empty() {
            continue;
        }

        let fields = table
            .columns
            .iter()
            .enumerate()
            .map(|(column_index, label)| {
                let value = table.rows[row_index]
                    .get(column_index)
                    .map(String::as_str)
                    .unwrap_or("");
                (label.clone(), value.to_string())
            })
            .collect();

        records.push(DocRecord {
            driver_name,
            ttn_number: resolved(canonical::TTN_NUMBER, row_index),
            ttn_date: resolved(canonical::TTN_DATE, row_index),
            route_number: resolved(canonical::ROUTE_NUMBER, row_index),
            waiting_period: resolved(canonical::WAITING_PERIOD, row_index),
            fields,
        });
    }

    debug!(attachment, records = records.len(), "extracted document records");
    Ok(records)
}
