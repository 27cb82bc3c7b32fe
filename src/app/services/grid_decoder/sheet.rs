//! Worksheet streaming into a raw cell grid

use std::io::{BufReader, Read, Seek};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use super::attribute;
use crate::app::models::{CellValue, RawGrid, excel_epoch};
use crate::{Error, Result};

const EPOCH_1904: &str = "1904-01-01";
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Stream one worksheet part into a rectangular [`RawGrid`]
///
/// Sparse rows and cells are padded with [`CellValue::Empty`] so that grid
/// coordinates match spreadsheet coordinates.
pub fn load_grid<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    sheet_path: &str,
    shared: &[String],
    date_styles: &[bool],
    date_1904: bool,
) -> Result<RawGrid> {
    let file = archive
        .by_name(sheet_path)
        .map_err(|_| Error::grid_decoding(format!("missing worksheet part {sheet_path}")))?;
    let mut reader = Reader::from_reader(BufReader::new(file));

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    let mut row: Vec<CellValue> = Vec::new();
    let mut cell = PendingCell::default();
    let mut in_value = false;
    let mut in_inline_text = false;
    let mut buffer = Vec::new();
    loop {
        match reader
            .read_event_into(&mut buffer)
            .map_err(|e| Error::grid_decoding(format!("{sheet_path}: {e}")))?
        {
            Event::Start(ref event) => match event.local_name().as_ref() {
                b"row" => {
                    // explicit row numbers leave gaps for skipped rows
                    if let Some(number) = attribute(event, b"r")?.and_then(|v| v.parse::<usize>().ok())
                    {
                        while rows.len() + 1 < number {
                            rows.push(Vec::new());
                        }
                    }
                    row.clear();
                }
                b"c" => cell = PendingCell::from_tag(event)?,
                b"v" => in_value = true,
                b"t" => in_inline_text = true,
                _ => {}
            },
            Event::Empty(ref event) => {
                if event.local_name().as_ref() == b"c" {
                    // self-closing cell without a value
                    let placeholder = PendingCell::from_tag(event)?;
                    place(&mut row, placeholder.column, CellValue::Empty);
                }
            }
            Event::Text(ref event) if in_value || in_inline_text => {
                let text = event
                    .unescape()
                    .map_err(|e| Error::grid_decoding(format!("{sheet_path}: {e}")))?;
                cell.raw.push_str(&text);
            }
            Event::End(ref event) => match event.local_name().as_ref() {
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                b"c" => {
                    let finished = std::mem::take(&mut cell);
                    let column = finished.column;
                    let value = finished.into_value(shared, date_styles, date_1904)?;
                    place(&mut row, column, value);
                }
                b"row" => rows.push(std::mem::take(&mut row)),
                b"sheetData" => break,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buffer.clear();
    }
    Ok(RawGrid::from_rows(rows))
}

/// Cell under construction while its XML element is open
#[derive(Debug, Default)]
struct PendingCell {
    column: Option<usize>,
    cell_type: String,
    style: Option<usize>,
    raw: String,
}

impl PendingCell {
    fn from_tag(event: &quick_xml::events::BytesStart<'_>) -> Result<Self> {
        let column = attribute(event, b"r")?.and_then(|r| reference_column(&r));
        let cell_type = attribute(event, b"t")?.unwrap_or_default();
        let style = attribute(event, b"s")?.and_then(|s| s.parse::<usize>().ok());
        Ok(Self {
            column,
            cell_type,
            style,
            raw: String::new(),
        })
    }

    fn into_value(
        self,
        shared: &[String],
        date_styles: &[bool],
        date_1904: bool,
    ) -> Result<CellValue> {
        let raw = self.raw.trim();
        if raw.is_empty() {
            return Ok(CellValue::Empty);
        }
        match self.cell_type.as_str() {
            "s" => {
                let index = raw
                    .parse::<usize>()
                    .map_err(|_| Error::grid_decoding(format!("bad shared string index {raw}")))?;
                let text = shared.get(index).ok_or_else(|| {
                    Error::grid_decoding(format!("shared string index {index} out of range"))
                })?;
                Ok(CellValue::Text(text.clone()))
            }
            "str" | "inlineStr" | "e" => Ok(CellValue::Text(raw.to_string())),
            "b" => Ok(CellValue::Bool(raw != "0")),
            _ => {
                let number = raw
                    .parse::<f64>()
                    .map_err(|_| Error::grid_decoding(format!("bad numeric cell value {raw}")))?;
                let is_date = self
                    .style
                    .and_then(|s| date_styles.get(s))
                    .copied()
                    .unwrap_or(false);
                if is_date {
                    Ok(serial_to_datetime(number, date_1904)
                        .map(CellValue::DateTime)
                        .unwrap_or(CellValue::Number(number)))
                } else {
                    Ok(CellValue::Number(number))
                }
            }
        }
    }
}

/// Place a value at its column, padding skipped cells with empties
fn place(row: &mut Vec<CellValue>, column: Option<usize>, value: CellValue) {
    let index = column.unwrap_or(row.len());
    while row.len() < index {
        row.push(CellValue::Empty);
    }
    if row.len() == index {
        row.push(value);
    } else {
        row[index] = value;
    }
}

/// Zero-based column index of a cell reference like `BC12`
fn reference_column(reference: &str) -> Option<usize> {
    let letters: String = reference
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for letter in letters.chars() {
        index = index * 26 + (letter.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    Some(index - 1)
}

/// Convert an Excel serial number to a date-time in the given date system
fn serial_to_datetime(serial: f64, date_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = if date_1904 {
        NaiveDate::parse_from_str(EPOCH_1904, "%Y-%m-%d").ok()?
    } else {
        excel_epoch()
    };
    let days = serial.trunc() as i64;
    let seconds = ((serial.fract()) * SECONDS_PER_DAY).round() as i64;
    epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::seconds(seconds))
}
