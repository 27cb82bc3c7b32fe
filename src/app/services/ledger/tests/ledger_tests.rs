//! Tests for ledger gating, pruning and persistence

use std::collections::HashMap;

use super::super::{Ledger, store};
use crate::config::LedgerConfig;

fn config_in(dir: &tempfile::TempDir) -> LedgerConfig {
    LedgerConfig::at(dir.path().join("processed.json"))
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Ledger::load(&config_in(&dir));

    assert!(ledger.is_empty());
}

#[test]
fn test_mark_and_contains_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let mut ledger = Ledger::load(&config);
    ledger.mark("uid1:0:abcdef");
    assert!(ledger.contains("uid1:0:abcdef"));
    assert!(!ledger.contains("uid1:1:abcdef"));
    ledger.save().unwrap();

    let reloaded = Ledger::load(&config);
    assert!(reloaded.contains("uid1:0:abcdef"));
    assert_eq!(reloaded.len(), 1);
}

#[test]
fn test_unmark_removes_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut ledger = Ledger::load(&config_in(&dir));

    ledger.mark("key");
    assert!(ledger.unmark("key"));
    assert!(!ledger.contains("key"));
    assert!(!ledger.unmark("key"));
}

#[test]
fn test_legacy_list_format_loads_and_ages_out() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    std::fs::write(&config.path, r#"["old-key-1", "old-key-2"]"#).unwrap();

    let mut ledger = Ledger::load(&config);
    assert!(ledger.contains("old-key-1"));
    assert!(ledger.contains("old-key-2"));

    // legacy entries carry timestamp zero and do not survive a save
    ledger.save().unwrap();
    let reloaded = Ledger::load(&config);
    assert!(reloaded.is_empty());
}

#[test]
fn test_malformed_file_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    std::fs::write(&config.path, "{not json").unwrap();

    let ledger = Ledger::load(&config);

    assert!(ledger.is_empty());
}

#[test]
fn test_save_prunes_beyond_key_cap_by_recency() {
    let dir = tempfile::tempdir().unwrap();
    let config = LedgerConfig {
        max_keys: 3,
        ..config_in(&dir)
    };

    // seed entries with increasing timestamps
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs_f64();
    let entries: HashMap<String, f64> = (0..5)
        .map(|i| (format!("key-{i}"), now - (100 - i) as f64))
        .collect();
    store::save(&config.path, &entries, false).unwrap();

    let mut ledger = Ledger::load(&config);
    ledger.save().unwrap();

    let reloaded = Ledger::load(&config);
    assert_eq!(reloaded.len(), 3);
    assert!(reloaded.contains("key-4"));
    assert!(reloaded.contains("key-3"));
    assert!(reloaded.contains("key-2"));
    assert!(!reloaded.contains("key-0"));
}

#[test]
fn test_save_prunes_stale_entries() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs_f64();
    let stale = now - (config.max_age_days as f64 + 1.0) * 24.0 * 60.0 * 60.0;
    let entries: HashMap<String, f64> =
        [("fresh".to_string(), now), ("stale".to_string(), stale)].into();
    store::save(&config.path, &entries, false).unwrap();

    let mut ledger = Ledger::load(&config);
    ledger.save().unwrap();

    let reloaded = Ledger::load(&config);
    assert!(reloaded.contains("fresh"));
    assert!(!reloaded.contains("stale"));
}

#[test]
fn test_backup_written_before_replace() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let mut ledger = Ledger::load(&config);
    ledger.mark("first");
    ledger.save().unwrap();
    ledger.mark("second");
    ledger.save().unwrap();

    let backup = dir.path().join("processed.json.bak");
    assert!(backup.exists());
    let backup_entries = store::load(&backup);
    assert!(backup_entries.contains_key("first"));
    assert!(!backup_entries.contains_key("second"));
}

#[test]
fn test_keys_by_recency_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let entries: HashMap<String, f64> = [
        ("oldest".to_string(), 100.0),
        ("newest".to_string(), 300.0),
        ("middle".to_string(), 200.0),
    ]
    .into();
    store::save(&config.path, &entries, false).unwrap();

    let ledger = Ledger::load(&config);

    assert_eq!(ledger.keys_by_recency(), vec!["newest", "middle", "oldest"]);
}
