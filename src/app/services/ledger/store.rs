//! Ledger file format and atomic persistence
//!
//! The current format is a JSON object of key to unix timestamp. Earlier
//! deployments wrote a bare JSON array of keys; those load as entries with
//! timestamp zero, which the next save prunes as stale.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::Value;
use tracing::warn;

use crate::{Error, Result};

/// Load ledger entries, degrading to empty on any read or parse problem
pub fn load(path: &Path) -> HashMap<String, f64> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read ledger, starting empty");
            return HashMap::new();
        }
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(key, value)| value.as_f64().map(|ts| (key, ts)))
            .collect(),
        Ok(Value::Array(keys)) => keys
            .into_iter()
            .filter_map(|value| value.as_str().map(|key| (key.to_string(), 0.0)))
            .collect(),
        Ok(_) | Err(_) => {
            warn!(path = %path.display(), "malformed ledger file, starting empty");
            HashMap::new()
        }
    }
}

/// Persist entries atomically, optionally keeping a `.bak` shadow copy
///
/// The new content lands in a temporary file in the ledger directory and
/// replaces the ledger with a rename, so a crash never leaves a torn file.
pub fn save(path: &Path, entries: &HashMap<String, f64>, write_backup: bool) -> Result<()> {
    let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(directory) = directory {
        fs::create_dir_all(directory)
            .map_err(|e| Error::ledger(format!("create {}: {e}", directory.display())))?;
    }

    if write_backup && path.exists() {
        let backup = path.with_extension("json.bak");
        if let Err(e) = fs::copy(path, &backup) {
            warn!(path = %backup.display(), error = %e, "failed to write ledger backup");
        }
    }

    let json = serde_json::to_string_pretty(entries)?;
    let mut temp = tempfile::NamedTempFile::new_in(
        directory.unwrap_or_else(|| Path::new(".")),
    )
    .map_err(|e| Error::ledger(format!("create temp file: {e}")))?;
    temp.write_all(json.as_bytes())
        .map_err(|e| Error::ledger(format!("write temp file: {e}")))?;
    temp.persist(path)
        .map_err(|e| Error::ledger(format!("replace {}: {e}", path.display())))?;
    Ok(())
}
