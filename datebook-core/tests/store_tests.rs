//! Store behavior across reopen, concurrent writers and failed writes.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use chrono::{NaiveDate, NaiveDateTime};
use datebook_core::store::{EventStore, RuleStore};
use datebook_core::{Category, Interval, NewEvent, RecurrenceRule};

fn at(d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn new_event(user_id: u64, title: &str) -> NewEvent {
    NewEvent::new(user_id, title, at(15, 10), at(15, 11), Category::Personal)
}

#[test]
fn concurrent_creates_never_share_an_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(EventStore::open(dir.path().join(EventStore::FILE_NAME)).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..10)
                    .map(|i| store.create(new_event(1, &format!("{t}-{i}"))).unwrap().id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let unique: HashSet<u64> = ids.iter().copied().collect();

    assert_eq!(ids.len(), 80);
    assert_eq!(unique.len(), 80);

    let reopened = EventStore::open(dir.path().join(EventStore::FILE_NAME)).unwrap();
    assert_eq!(reopened.len(), 80);
}

#[test]
fn two_handles_opened_together_never_reuse_ids_or_drop_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(EventStore::FILE_NAME);

    let server = EventStore::open(&path).unwrap();
    let cli = EventStore::open(&path).unwrap();

    let a = server.create(new_event(1, "from server")).unwrap();
    let b = cli.create(new_event(2, "from cli")).unwrap();
    let c = server.create(new_event(1, "server again")).unwrap();

    assert_eq!((a.id, b.id, c.id), (1, 2, 3));

    // Each handle sees the other's writes once it has written itself.
    assert_eq!(server.len(), 3);

    // Mutations see records the handle never loaded.
    assert!(cli.delete(c.id).unwrap());

    let reopened = EventStore::open(&path).unwrap();
    let titles: Vec<(u64, String)> = reopened.list().into_iter().map(|e| (e.id, e.title)).collect();
    assert_eq!(
        titles,
        vec![(1, "from server".to_string()), (2, "from cli".to_string())]
    );
}

#[test]
fn threads_with_separate_handles_keep_ids_unique() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(EventStore::FILE_NAME);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = EventStore::open(&path).unwrap();
            thread::spawn(move || {
                (0..10)
                    .map(|i| store.create(new_event(1, &format!("{t}-{i}"))).unwrap().id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let unique: HashSet<u64> = ids.iter().copied().collect();

    assert_eq!(unique.len(), 40);
    assert_eq!(EventStore::open(&path).unwrap().len(), 40);
}

#[test]
fn failed_write_leaves_store_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let store = EventStore::open(data.join(EventStore::FILE_NAME)).unwrap();
    let kept = store.create(new_event(1, "kept")).unwrap();

    // Replace the data directory with a plain file so the next flush fails.
    std::fs::remove_dir_all(&data).unwrap();
    std::fs::write(&data, "not a directory").unwrap();

    assert!(store.create(new_event(1, "lost")).is_err());
    assert!(store.update(kept.id, new_event(1, "renamed")).is_err());
    assert!(store.delete(kept.id).is_err());

    assert_eq!(store.list(), vec![kept]);
}

#[test]
fn rule_survives_event_deletion() {
    let dir = tempfile::tempdir().unwrap();
    let events = EventStore::open(dir.path().join(EventStore::FILE_NAME)).unwrap();
    let rules = RuleStore::open(dir.path().join(RuleStore::FILE_NAME)).unwrap();

    let event = events.create(new_event(1, "weekly")).unwrap();
    rules
        .upsert(RecurrenceRule::new(event.id, Interval::Weekly, 5))
        .unwrap();
    events.delete(event.id).unwrap();

    assert!(events.find_by_id(event.id).is_none());
    assert_eq!(rules.list().len(), 1);
}
