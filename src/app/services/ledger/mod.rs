//! Idempotency ledger for processed attachments
//!
//! Maps attachment ledger keys to the unix time they were processed.
//! Gate checks read the in-memory map; persistence happens explicitly so a
//! run can mark keys during processing and save only after a successful
//! delivery.

pub mod store;

#[cfg(test)]
pub mod tests;

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::Result;
use crate::config::LedgerConfig;

/// In-memory ledger bound to its on-disk location
#[derive(Debug, Clone)]
pub struct Ledger {
    config: LedgerConfig,
    entries: HashMap<String, f64>,
}

impl Ledger {
    /// Load the ledger from its configured path
    ///
    /// A missing file is an empty ledger; an unreadable or malformed file
    /// degrades to an empty ledger with a warning, trading duplicate sends
    /// for availability.
    pub fn load(config: &LedgerConfig) -> Self {
        let entries = store::load(&config.path);
        debug!(path = %config.path.display(), entries = entries.len(), "loaded ledger");
        Self {
            config: config.clone(),
            entries,
        }
    }

    /// True when the key was already processed
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Record a key as processed now
    pub fn mark(&mut self, key: impl Into<String>) {
        self.entries.insert(key.into(), unix_now());
    }

    /// Remove a key, if present
    pub fn unmark(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys ordered from most to least recently processed
    pub fn keys_by_recency(&self) -> Vec<&str> {
        let mut items: Vec<(&str, f64)> = self
            .entries
            .iter()
            .map(|(key, ts)| (key.as_str(), *ts))
            .collect();
        items.sort_by(|a, b| b.1.total_cmp(&a.1));
        items.into_iter().map(|(key, _)| key).collect()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Prune stale entries and persist atomically
    ///
    /// Entries older than the age bound are dropped first; if the remainder
    /// still exceeds the key cap, only the most recent survive.
    pub fn save(&mut self) -> Result<()> {
        let now = unix_now();
        let max_age_seconds = self.config.max_age_days as f64 * 24.0 * 60.0 * 60.0;
        self.entries
            .retain(|_, timestamp| now - *timestamp < max_age_seconds);

        if self.entries.len() > self.config.max_keys {
            let mut items: Vec<(String, f64)> = self.entries.drain().collect();
            items.sort_by(|a, b| b.1.total_cmp(&a.1));
            items.truncate(self.config.max_keys);
            self.entries = items.into_iter().collect();
        }

        store::save(
            &self.config.path,
            &self.entries,
            self.config.write_backup,
        )?;
        debug!(path = %self.config.path.display(), entries = self.entries.len(), "saved ledger");
        Ok(())
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}
