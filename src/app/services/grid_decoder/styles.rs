//! Cell style classification for serial date detection
//!
//! A numeric cell carries a date or time only through its number format.
//! This module reduces `xl/styles.xml` to one flag per cell-format index:
//! does the format render the serial as a date/time.

use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;
use zip::result::ZipError;

use super::attribute;
use crate::{Error, Result};

/// Per cellXfs index: true when the format renders a date or time
pub fn load_date_styles<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<bool>> {
    let file = match archive.by_name("xl/styles.xml") {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut reader = Reader::from_reader(BufReader::new(file));

    let mut custom_formats = HashMap::<u32, bool>::new();
    let mut date_styles = Vec::new();
    let mut in_cell_formats = false;
    let mut buffer = Vec::new();
    loop {
        match reader
            .read_event_into(&mut buffer)
            .map_err(|e| Error::grid_decoding(format!("styles.xml: {e}")))?
        {
            Event::Start(ref event) | Event::Empty(ref event) => {
                match event.local_name().as_ref() {
                    b"numFmt" => {
                        let id = attribute(event, b"numFmtId")?
                            .and_then(|v| v.parse::<u32>().ok());
                        let code = attribute(event, b"formatCode")?;
                        if let (Some(id), Some(code)) = (id, code) {
                            custom_formats.insert(id, format_code_is_datetime(&code));
                        }
                    }
                    b"cellXfs" => in_cell_formats = true,
                    b"xf" if in_cell_formats => {
                        let id = attribute(event, b"numFmtId")?
                            .and_then(|v| v.parse::<u32>().ok())
                            .unwrap_or(0);
                        let is_date = custom_formats
                            .get(&id)
                            .copied()
                            .unwrap_or_else(|| builtin_is_datetime(id));
                        date_styles.push(is_date);
                    }
                    _ => {}
                }
            }
            Event::End(ref event) if event.local_name().as_ref() == b"cellXfs" => {
                in_cell_formats = false;
            }
            Event::Eof => break,
            _ => {}
        }
        buffer.clear();
    }
    Ok(date_styles)
}

/// Built-in number formats that render dates or times
fn builtin_is_datetime(id: u32) -> bool {
    matches!(id, 14..=22 | 45..=47)
}

/// Scan a custom format code for date/time placeholders
///
/// Quoted literals, bracketed sections and escaped characters are skipped
/// so that codes like `"days"` or `[Red]` do not trigger a false positive.
fn format_code_is_datetime(code: &str) -> bool {
    let mut escaped = false;
    let mut literal = false;
    let mut bracketed = false;
    for character in code.chars() {
        match character {
            _ if escaped => escaped = false,
            '_' | '\\' if !literal && !bracketed => escaped = true,
            '"' if literal => literal = false,
            '"' if !bracketed => literal = true,
            ']' if bracketed => bracketed = false,
            '[' if !literal => bracketed = true,
            _ if literal || bracketed => {}
            'y' | 'Y' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::{builtin_is_datetime, format_code_is_datetime};

    #[test]
    fn test_builtin_date_format_ids() {
        assert!(builtin_is_datetime(14));
        assert!(builtin_is_datetime(22));
        assert!(builtin_is_datetime(46));
        assert!(!builtin_is_datetime(0));
        assert!(!builtin_is_datetime(2));
        assert!(!builtin_is_datetime(44));
    }

    #[test]
    fn test_custom_format_detection() {
        assert!(format_code_is_datetime("dd.mm.yyyy"));
        assert!(format_code_is_datetime("hh:mm"));
        assert!(format_code_is_datetime("[$-409]d-mmm-yy"));
        assert!(!format_code_is_datetime("0.00"));
        assert!(!format_code_is_datetime("#,##0"));
        // placeholders inside quoted literals do not count
        assert!(!format_code_is_datetime("0\" days\""));
        assert!(!format_code_is_datetime("[Red]0.0"));
    }
}
