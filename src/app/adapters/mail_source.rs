//! Attachment acquisition seam
//!
//! Mail transport lives outside this service; attachments arrive as files
//! in a drop directory written by the retrieval job. The trait keeps the
//! pipeline testable against in-memory sources.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::app::models::Attachment;
use crate::{Error, Result};

/// Source of spreadsheet attachments for one pipeline run
pub trait AttachmentSource {
    /// Collect every candidate attachment, in a stable order
    fn collect(&self) -> Result<Vec<Attachment>>;
}

/// Directory walker over exported attachments
///
/// The message id is the file stem, so a re-export of the same message
/// produces the same ledger key as long as the content matches.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AttachmentSource for DirectorySource {
    fn collect(&self) -> Result<Vec<Attachment>> {
        if !self.root.is_dir() {
            return Err(Error::configuration(format!(
                "attachment directory {} does not exist",
                self.root.display()
            )));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_spreadsheet(path))
            .collect();
        files.sort();

        let mut attachments = Vec::new();
        for (position, path) in files.iter().enumerate() {
            let data = match std::fs::read(path) {
                Ok(data) => data,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable attachment");
                    continue;
                }
            };
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let message_id = path
                .file_stem()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            attachments.push(Attachment::new(message_id, position, filename, data));
        }

        debug!(root = %self.root.display(), count = attachments.len(), "collected attachments");
        Ok(attachments)
    }
}

/// Spreadsheet filename check, ignoring editor lock files
fn is_spreadsheet(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    if name.starts_with("~$") {
        return false;
    }
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xlsx") || e.eq_ignore_ascii_case("xlsm"))
        .unwrap_or(false)
}
