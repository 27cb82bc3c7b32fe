//! Workbook layout: sheet order, sheet targets and the serial date system

use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;
use zip::result::ZipError;

use super::attribute;
use crate::{Error, Result};

/// Resolved workbook structure
#[derive(Debug, Clone, Default)]
pub struct WorkbookLayout {
    /// Worksheets in workbook order as (name, zip path) pairs
    pub sheets: Vec<(String, String)>,
    /// True when serial dates count from the 1904 epoch
    pub date_system_1904: bool,
}

/// Parse `xl/workbook.xml` and its relationship part into a layout
pub fn load_layout<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<WorkbookLayout> {
    let relationships = load_relationships(archive)?;

    let file = archive
        .by_name("xl/workbook.xml")
        .map_err(|_| Error::grid_decoding("missing xl/workbook.xml"))?;
    let mut reader = Reader::from_reader(BufReader::new(file));

    let mut layout = WorkbookLayout::default();
    let mut buffer = Vec::new();
    loop {
        match reader
            .read_event_into(&mut buffer)
            .map_err(|e| Error::grid_decoding(format!("workbook.xml: {e}")))?
        {
            Event::Start(ref event) | Event::Empty(ref event) => {
                match event.local_name().as_ref() {
                    b"sheet" => {
                        let name = attribute(event, b"name")?.unwrap_or_default();
                        let rel_id = attribute(event, b"r:id")?.unwrap_or_default();
                        if let Some(target) = relationships.get(&rel_id) {
                            layout.sheets.push((name, to_zip_path(target)));
                        }
                    }
                    b"workbookPr" => {
                        if let Some(flag) = attribute(event, b"date1904")? {
                            layout.date_system_1904 = flag == "1" || flag == "true";
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buffer.clear();
    }
    Ok(layout)
}

/// Relationship id to target map from `xl/_rels/workbook.xml.rels`
fn load_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<HashMap<String, String>> {
    let file = match archive.by_name("xl/_rels/workbook.xml.rels") {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(HashMap::new()),
        Err(e) => return Err(e.into()),
    };
    let mut reader = Reader::from_reader(BufReader::new(file));

    let mut relationships = HashMap::new();
    let mut buffer = Vec::new();
    loop {
        match reader
            .read_event_into(&mut buffer)
            .map_err(|e| Error::grid_decoding(format!("workbook.xml.rels: {e}")))?
        {
            Event::Start(ref event) | Event::Empty(ref event) => {
                if event.local_name().as_ref() == b"Relationship" {
                    let id = attribute(event, b"Id")?;
                    let target = attribute(event, b"Target")?;
                    if let (Some(id), Some(target)) = (id, target) {
                        relationships.insert(id, target);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buffer.clear();
    }
    Ok(relationships)
}

/// Normalize a relationship target to a zip entry path under `xl/`
fn to_zip_path(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else if target.starts_with("xl/") {
        target.to_string()
    } else {
        format!("xl/{target}")
    }
}
