//! Spreadsheet decoder for xlsx attachment bytes
//!
//! Opens the zip container, resolves the workbook layout (sheet order and
//! date system), loads the shared string table and the style-level date
//! classification, then streams the first worksheet into a [`RawGrid`].
//! Only the parts of the OOXML format the reports actually use are handled.

pub mod shared_strings;
pub mod sheet;
pub mod styles;
pub mod workbook;

#[cfg(test)]
pub mod tests;

use std::io::Cursor;

use quick_xml::events::BytesStart;
use zip::ZipArchive;

use crate::app::models::RawGrid;
use crate::{Error, Result};

/// Decode the first worksheet of an xlsx file into a raw grid
///
/// Attachment bytes are decoded in memory; the input is never touched on
/// disk. Reports ship their table on the first sheet, so the remaining
/// sheets are ignored.
pub fn decode_first_sheet(data: &[u8]) -> Result<RawGrid> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let layout = workbook::load_layout(&mut archive)?;
    let (sheet_name, sheet_path) = layout
        .sheets
        .first()
        .ok_or_else(|| Error::grid_decoding("workbook contains no worksheets"))?
        .clone();

    let shared = shared_strings::load(&mut archive)?;
    let date_styles = styles::load_date_styles(&mut archive)?;

    tracing::debug!(
        sheet = %sheet_name,
        shared_strings = shared.len(),
        date_1904 = layout.date_system_1904,
        "decoding worksheet"
    );

    sheet::load_grid(
        &mut archive,
        &sheet_path,
        &shared,
        &date_styles,
        layout.date_system_1904,
    )
}

/// Unescaped value of a named attribute on a start tag, if present
pub(crate) fn attribute(start: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attribute in start.attributes().with_checks(false) {
        let attribute =
            attribute.map_err(|e| Error::grid_decoding(format!("malformed attribute: {e}")))?;
        if attribute.key.as_ref() == name {
            let value = attribute
                .unescape_value()
                .map_err(|e| Error::grid_decoding(format!("malformed attribute value: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
