//! Cross-file record deduplication
//!
//! Each family has its own merge policy. All three preserve the order of
//! first occurrence: a replacement overwrites the survivor in place, it
//! never moves it.

use std::collections::HashMap;

use tracing::debug;

use crate::app::models::{DocRecord, LateRecord, ShiftRecord};

/// Collapse delay records on (driver, route, planned time), keeping the
/// largest delay
///
/// Equal delays keep the earlier record, so re-sent attachments cannot
/// reshuffle the output.
pub fn dedup_late(records: Vec<LateRecord>) -> Vec<LateRecord> {
    let total = records.len();
    let mut survivors: Vec<LateRecord> = Vec::new();
    let mut index_by_key: HashMap<(String, String, String), usize> = HashMap::new();

    for record in records {
        match index_by_key.get(&record.dedup_key()) {
            Some(&index) => {
                if record.delay_minutes > survivors[index].delay_minutes {
                    survivors[index] = record;
                }
            }
            None => {
                index_by_key.insert(record.dedup_key(), survivors.len());
                survivors.push(record);
            }
        }
    }

    debug!(total, unique = survivors.len(), "deduplicated delay records");
    survivors
}

/// Collapse document records on (ttn number, ttn date, driver, route
/// number), keeping the first occurrence
pub fn dedup_docs(records: Vec<DocRecord>) -> Vec<DocRecord> {
    let total = records.len();
    let mut survivors: Vec<DocRecord> = Vec::new();
    let mut index_by_key: HashMap<(String, String, String, String), usize> = HashMap::new();

    for record in records {
        let key = record.dedup_key();
        if !index_by_key.contains_key(&key) {
            index_by_key.insert(key, survivors.len());
            survivors.push(record);
        }
    }

    debug!(total, unique = survivors.len(), "deduplicated document records");
    survivors
}

/// Collapse shift records on the whole composite key, keeping the last
/// occurrence
///
/// Later files carry corrected assignments, so the latest version of an
/// identical-key row wins while holding its original position.
pub fn dedup_shifts(records: Vec<ShiftRecord>) -> Vec<ShiftRecord> {
    let total = records.len();
    let mut survivors: Vec<ShiftRecord> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for record in records {
        match index_by_key.get(&record.dedup_key()) {
            Some(&index) => survivors[index] = record,
            None => {
                index_by_key.insert(record.dedup_key(), survivors.len());
                survivors.push(record);
            }
        }
    }

    debug!(total, unique = survivors.len(), "deduplicated shift records");
    survivors
}
