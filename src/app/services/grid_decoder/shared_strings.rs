//! Shared string table loading

use std::io::{Read, Seek};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::{Error, Result};

/// Load `xl/sharedStrings.xml` into an index-ordered string table
///
/// Rich-text runs are concatenated into a single string per item and
/// phonetic annotations are skipped. A workbook without a shared string
/// part yields an empty table.
pub fn load<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
    let file = match archive.by_name("xl/sharedStrings.xml") {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut reader = Reader::from_reader(std::io::BufReader::new(file));

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_item = false;
    let mut in_text = false;
    let mut in_phonetic = false;
    let mut buffer = Vec::new();
    loop {
        match reader
            .read_event_into(&mut buffer)
            .map_err(|e| Error::grid_decoding(format!("sharedStrings.xml: {e}")))?
        {
            Event::Start(ref event) => match event.local_name().as_ref() {
                b"si" => {
                    in_item = true;
                    current.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_item && !in_phonetic => in_text = true,
                _ => {}
            },
            Event::End(ref event) => match event.local_name().as_ref() {
                b"si" => {
                    in_item = false;
                    strings.push(std::mem::take(&mut current));
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(ref event) if in_text => {
                let text = event
                    .unescape()
                    .map_err(|e| Error::grid_decoding(format!("sharedStrings.xml: {e}")))?;
                current.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
        buffer.clear();
    }
    Ok(strings)
}
