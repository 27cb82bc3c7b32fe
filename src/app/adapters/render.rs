//! Table artifact rendering
//!
//! Deliveries attach a rendered table artifact next to the caption. The
//! trait keeps the pipeline independent of the artifact format; the
//! default renderer produces an aligned monospace table, which the
//! messaging side uploads as a document.

use crate::Result;
use crate::app::models::{DocRecord, LateRecord};
use crate::app::services::record_processor::delay_marker;
use crate::app::services::table_parser::values::normalize_label;

/// Renderer of delivery-ready table artifacts
pub trait TableRenderer {
    /// Render the delay summary table
    fn render_late(&self, records: &[LateRecord]) -> Result<Vec<u8>>;

    /// Render one driver's outstanding documents
    ///
    /// `drop_tokens` name administrative columns excluded from the
    /// rendering; the records keep them for deduplication.
    fn render_docs(&self, records: &[DocRecord], drop_tokens: &[String]) -> Result<Vec<u8>>;

    /// File name the artifact should carry in the upload
    fn artifact_name(&self) -> &str;
}

/// Plain-text renderer producing aligned monospace tables
#[derive(Debug, Clone, Default)]
pub struct TextTableRenderer;

impl TextTableRenderer {
    fn layout(headers: &[String], rows: &[Vec<String>]) -> String {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (index, cell) in row.iter().enumerate() {
                if index < widths.len() {
                    widths[index] = widths[index].max(cell.chars().count());
                }
            }
        }

        let format_row = |cells: &[String]| -> String {
            let padded: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(index, cell)| {
                    let width = widths.get(index).copied().unwrap_or(0);
                    let pad = width.saturating_sub(cell.chars().count());
                    format!("{cell}{}", " ".repeat(pad))
                })
                .collect();
            padded.join("  ").trim_end().to_string()
        };

        let separator = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ");

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(format_row(headers));
        lines.push(separator);
        for row in rows {
            lines.push(format_row(row));
        }
        lines.join("\n")
    }
}

impl TableRenderer for TextTableRenderer {
    fn render_late(&self, records: &[LateRecord]) -> Result<Vec<u8>> {
        let headers = vec![
            "".to_string(),
            "Driver".to_string(),
            "Plate".to_string(),
            "Route".to_string(),
            "Planned".to_string(),
            "Assigned".to_string(),
            "Delay".to_string(),
        ];
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|r| {
                vec![
                    delay_marker(r.delay_minutes).to_string(),
                    r.driver_name.clone(),
                    r.plate_number.clone(),
                    r.route_name.clone(),
                    r.planned_time.clone(),
                    r.assigned_time.clone(),
                    r.delay_minutes.to_string(),
                ]
            })
            .collect();
        Ok(Self::layout(&headers, &rows).into_bytes())
    }

    fn render_docs(&self, records: &[DocRecord], drop_tokens: &[String]) -> Result<Vec<u8>> {
        // column set from the first record; all rows of one table share it
        let headers: Vec<String> = records
            .first()
            .map(|record| {
                record
                    .fields
                    .iter()
                    .map(|(label, _)| label.clone())
                    .filter(|label| !is_dropped(label, drop_tokens))
                    .collect()
            })
            .unwrap_or_default();

        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| {
                record
                    .fields
                    .iter()
                    .filter(|(label, _)| !is_dropped(label, drop_tokens))
                    .map(|(_, value)| value.clone())
                    .collect()
            })
            .collect();
        Ok(Self::layout(&headers, &rows).into_bytes())
    }

    fn artifact_name(&self) -> &str {
        "report.txt"
    }
}

fn is_dropped(label: &str, drop_tokens: &[String]) -> bool {
    let normalized = normalize_label(label);
    drop_tokens
        .iter()
        .any(|token| normalized.contains(token.as_str()))
}

#[cfg(test)]
mod tests {
    use super::{TableRenderer, TextTableRenderer};
    use crate::app::models::{DocRecord, LateRecord};

    fn late(driver: &str, delay: i64) -> LateRecord {
        LateRecord {
            driver_name: driver.to_string(),
            plate_number: "AB 104".to_string(),
            route_name: "North 14".to_string(),
            planned_time: "08:00".to_string(),
            assigned_time: "08:10".to_string(),
            delay_minutes: delay,
        }
    }

    #[test]
    fn test_late_table_contains_all_records() {
        let renderer = TextTableRenderer;
        let artifact = renderer
            .render_late(&[late("Smith J.", 25), late("Jones A.", 5)])
            .unwrap();
        let text = String::from_utf8(artifact).unwrap();

        assert!(text.contains("Smith J."));
        assert!(text.contains("Jones A."));
        assert!(text.lines().count() >= 4);
    }

    #[test]
    fn test_docs_table_drops_administrative_columns() {
        let renderer = TextTableRenderer;
        let record = DocRecord {
            driver_name: "Smith J.".to_string(),
            ttn_number: "123456".to_string(),
            ttn_date: "2024-03-15".to_string(),
            route_number: "14".to_string(),
            waiting_period: "5 days".to_string(),
            fields: vec![
                ("Driver full name".to_string(), "Smith J.".to_string()),
                ("TTN number".to_string(), "123456".to_string()),
                ("Site".to_string(), "Depot 3".to_string()),
            ],
        };
        let drop = vec!["site".to_string()];

        let artifact = renderer.render_docs(&[record], &drop).unwrap();
        let text = String::from_utf8(artifact).unwrap();

        assert!(text.contains("123456"));
        assert!(!text.contains("Depot 3"));
        assert!(!text.contains("Site"));
    }

    #[test]
    fn test_columns_aligned() {
        let renderer = TextTableRenderer;
        let artifact = renderer
            .render_late(&[late("A.", 5), late("Longname B.", 12)])
            .unwrap();
        let text = String::from_utf8(artifact).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // rows share the column grid regardless of name width
        let char_offset = |line: &str, needle: &str| -> usize {
            let byte = line.find(needle).unwrap();
            line[..byte].chars().count()
        };
        assert_eq!(
            char_offset(lines[2], "AB 104"),
            char_offset(lines[3], "AB 104")
        );
    }
}
