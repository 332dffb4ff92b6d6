//! Tests for the cross-run identity store

mod common;

use common::{item_url, record};
use kodegen_tools_listscrape::content_saver::{CsvRecordStore, RecordStore};
use kodegen_tools_listscrape::{IdentityPolicy, IdentityStore};
use tempfile::TempDir;

#[test]
fn load_unions_master_and_ledger() {
    let dir = TempDir::new().unwrap();
    let master = CsvRecordStore::new(dir.path().join("master.csv"));
    master.replace_all(&[record("A", "")]).unwrap();
    let ledger = dir.path().join("seen.txt");
    std::fs::write(&ledger, format!("{}\n\n  {}  \n", item_url("B"), item_url("C"))).unwrap();

    let store = IdentityStore::load(&master, &ledger, IdentityPolicy::MarkOnDiscovery).unwrap();

    assert_eq!(store.len(), 3);
    assert!(store.contains(&item_url("A")));
    assert!(store.contains(&item_url("C")));
}

#[test]
fn extraction_policy_ignores_ledger() {
    let dir = TempDir::new().unwrap();
    let master = CsvRecordStore::new(dir.path().join("master.csv"));
    let ledger = dir.path().join("seen.txt");
    std::fs::write(&ledger, format!("{}\n", item_url("B"))).unwrap();

    let store = IdentityStore::load(&master, &ledger, IdentityPolicy::MarkOnExtraction).unwrap();

    assert!(store.is_empty());
}

#[test]
fn insert_reports_novelty() {
    let mut store = IdentityStore::new(IdentityPolicy::MarkOnDiscovery);
    assert!(store.insert("x"));
    assert!(!store.insert("x"));
    assert_eq!(store.discovered(), ["x".to_string()]);
}

#[test]
fn finalize_appends_unextracted_to_ledger() {
    let dir = TempDir::new().unwrap();
    let master = CsvRecordStore::new(dir.path().join("master.csv"));
    let ledger = dir.path().join("seen.txt");
    std::fs::write(&ledger, "old\n").unwrap();

    let mut store = IdentityStore::load(&master, &ledger, IdentityPolicy::MarkOnDiscovery).unwrap();
    store.insert("ok");
    store.insert("failed");
    store.mark_extracted("ok");

    assert_eq!(store.unextracted().collect::<Vec<_>>(), vec!["failed"]);
    assert_eq!(store.finalize().unwrap(), 2);
    assert_eq!(std::fs::read_to_string(&ledger).unwrap(), "old\nfailed\n");
}

#[test]
fn finalize_without_failures_leaves_ledger_alone() {
    let dir = TempDir::new().unwrap();
    let master = CsvRecordStore::new(dir.path().join("master.csv"));
    let ledger = dir.path().join("seen.txt");

    let mut store = IdentityStore::load(&master, &ledger, IdentityPolicy::MarkOnDiscovery).unwrap();
    store.insert("ok");
    store.mark_extracted("ok");
    store.finalize().unwrap();

    assert!(!ledger.exists());
}

#[test]
fn extraction_policy_never_writes_ledger() {
    let dir = TempDir::new().unwrap();
    let master = CsvRecordStore::new(dir.path().join("master.csv"));
    let ledger = dir.path().join("seen.txt");

    let mut store = IdentityStore::load(&master, &ledger, IdentityPolicy::MarkOnExtraction).unwrap();
    store.insert("failed");

    assert_eq!(store.finalize().unwrap(), 0);
    assert!(!ledger.exists());
}
