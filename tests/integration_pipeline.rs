//! Integration tests for the full extraction pipeline
//!
//! Exercises the public API end to end: xlsx bytes are synthesized in
//! memory, dropped into a source directory, and pushed through decode,
//! classification, dedup and dry-run delivery, including the ledger
//! persistence across runs.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use fleet_reports::PipelineConfig;
use fleet_reports::processor::ReportPipeline;

/// One worksheet cell for the in-memory xlsx builder
enum Cell {
    Text(&'static str),
    Number(f64),
    /// Serial number rendered through a date-formatted style
    DateSerial(f64),
}

/// Build a minimal single-sheet xlsx container
fn build_xlsx(rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row_index, row) in rows.iter().enumerate() {
        sheet.push_str(&format!(r#"<row r="{}">"#, row_index + 1));
        for (column_index, cell) in row.iter().enumerate() {
            let reference = format!(
                "{}{}",
                (b'A' + column_index as u8) as char,
                row_index + 1
            );
            match cell {
                Cell::Text(value) => sheet.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{value}</t></is></c>"#
                )),
                Cell::Number(value) => {
                    sheet.push_str(&format!(r#"<c r="{reference}"><v>{value}</v></c>"#))
                }
                Cell::DateSerial(value) => sheet.push_str(&format!(
                    r#"<c r="{reference}" s="1"><v>{value}</v></c>"#
                )),
            }
        }
        sheet.push_str("</row>");
    }
    sheet.push_str("</sheetData></worksheet>");

    let workbook = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Report" sheetId="1" r:id="rId1"/></sheets></workbook>"#;
    let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;
    let styles = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14"/></cellXfs></styleSheet>"#;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (path, content) in [
        ("xl/workbook.xml", workbook),
        ("xl/_rels/workbook.xml.rels", rels),
        ("xl/styles.xml", styles),
        ("xl/worksheets/sheet1.xml", sheet.as_str()),
    ] {
        writer.start_file(path, options).expect("zip entry");
        writer.write_all(content.as_bytes()).expect("zip write");
    }
    writer.finish().expect("zip finish").into_inner()
}

fn late_report() -> Vec<u8> {
    build_xlsx(&[
        vec![
            Cell::Text("Full Name"),
            Cell::Text("Plate Number"),
            Cell::Text("Route Name"),
            Cell::Text("Planned Time"),
            Cell::Text("Assigned Time"),
            Cell::Text("Delay, minutes"),
        ],
        vec![
            Cell::Text("Smith J."),
            Cell::Text("ab123cd"),
            Cell::Text("North loop"),
            Cell::DateSerial(0.333_333_333_3),
            Cell::DateSerial(0.350_694_444_4),
            Cell::Number(25.0),
        ],
        vec![
            Cell::Text("Jones A."),
            Cell::Text("xy987zw"),
            Cell::Text("South loop"),
            Cell::DateSerial(0.375),
            Cell::DateSerial(0.375),
            Cell::Number(0.0),
        ],
    ])
}

fn docs_report() -> Vec<u8> {
    build_xlsx(&[
        vec![
            Cell::Text("Full Name"),
            Cell::Text("TTN Number"),
            Cell::Text("TTN Date"),
            Cell::Text("Route Number"),
            Cell::Text("Waiting Period"),
        ],
        vec![
            Cell::Text("Smith John"),
            Cell::Number(123456.0),
            Cell::DateSerial(45366.0),
            Cell::Number(12.0),
            Cell::Text("5 days, 0 hours, 0 minutes"),
        ],
    ])
}

fn dry_run_pipeline(root: &Path) -> ReportPipeline {
    let config = PipelineConfig::default()
        .with_input_dir(root.join("inbox"))
        .with_ledger_dir(root.join("state"))
        .with_dry_run()
        .without_docs_date_filter();
    ReportPipeline::new(config).expect("valid configuration")
}

fn write_report(root: &Path, name: &str, data: &[u8]) {
    let inbox = root.join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    fs::write(inbox.join(name), data).unwrap();
}

#[tokio::test]
async fn test_pipeline_processes_mixed_inbox() {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), "delays.xlsx", &late_report());
    write_report(dir.path(), "docs.xlsx", &docs_report());
    let pipeline = dry_run_pipeline(dir.path());

    let summary = pipeline.run().await.expect("pipeline run");
    assert_eq!(summary.attachments_seen, 2);
    assert_eq!(summary.late_records, 1);
    assert_eq!(summary.docs_records, 1);
    assert!(summary.is_clean());

    // the ledger files were persisted after the dry-run delivery
    assert!(dir.path().join("state").join("processed.json").exists());
}

#[tokio::test]
async fn test_pipeline_is_idempotent_across_runs() {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), "delays.xlsx", &late_report());
    let pipeline = dry_run_pipeline(dir.path());

    let first = pipeline.run().await.expect("first run");
    assert_eq!(first.late_records, 1);

    let second = pipeline.run().await.expect("second run");
    assert_eq!(second.skipped_processed, 1);
    assert_eq!(second.late_records, 0);
    assert_eq!(second.messages_sent, 0);
}

#[tokio::test]
async fn test_renamed_copy_is_still_deduplicated_by_content() {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), "delays.xlsx", &late_report());
    let pipeline = dry_run_pipeline(dir.path());
    pipeline.run().await.expect("first run");

    // same bytes under a new name produce the same content hash suffix,
    // but a different message id, so the attachment is re-read while its
    // records collapse in the dedup pass of that run only
    write_report(dir.path(), "delays_copy.xlsx", &late_report());
    let summary = pipeline.run().await.expect("second run");
    assert_eq!(summary.late_records, 1);
}

#[tokio::test]
async fn test_empty_inbox_is_a_clean_run() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("inbox")).unwrap();
    let pipeline = dry_run_pipeline(dir.path());

    let summary = pipeline.run().await.expect("run");
    assert_eq!(summary.attachments_seen, 0);
    assert_eq!(summary.messages_sent, 0);
    assert!(summary.is_clean());
}
