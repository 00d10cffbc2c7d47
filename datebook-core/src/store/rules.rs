//! Recurrence rule storage (`recurrence.csv`), keyed by event id.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::table::{CsvTable, Outcome, Record};
use crate::error::DatebookResult;
use crate::recurrence::{Interval, RecurrenceRule};

#[derive(Serialize, Deserialize)]
pub struct RuleRow {
    #[serde(rename = "eventId")]
    event_id: u64,
    #[serde(rename = "recurrentInterval")]
    interval: Interval,
    #[serde(rename = "recurrentTimes")]
    times: u32,
    #[serde(rename = "recurrentEndDate", with = "crate::timestamp::optional_date")]
    end_date: Option<NaiveDate>,
}

impl Record for RecurrenceRule {
    type Row = RuleRow;

    const HEADERS: &'static [&'static str] = &[
        "eventId",
        "recurrentInterval",
        "recurrentTimes",
        "recurrentEndDate",
    ];

    fn key(&self) -> u64 {
        self.event_id
    }

    fn to_row(&self) -> RuleRow {
        RuleRow {
            event_id: self.event_id,
            interval: self.interval,
            times: self.times,
            end_date: self.end_date,
        }
    }

    fn from_row(row: RuleRow) -> Self {
        RecurrenceRule {
            event_id: row.event_id,
            interval: row.interval,
            times: row.times,
            end_date: row.end_date,
        }
    }
}

/// Owns the recurrence rule of each event, at most one per event.
pub struct RuleStore {
    table: CsvTable<RecurrenceRule>,
}

impl RuleStore {
    pub const FILE_NAME: &'static str = "recurrence.csv";

    pub fn open(path: impl Into<PathBuf>) -> DatebookResult<Self> {
        Ok(RuleStore {
            table: CsvTable::open(path)?,
        })
    }

    pub fn get(&self, event_id: u64) -> Option<RecurrenceRule> {
        self.table.find(|r| r.event_id == event_id)
    }

    /// Insert or replace the rule for `rule.event_id`.
    ///
    /// A rule that does not repeat is not written, and any rule already
    /// stored for the event is kept. Returns whether the store changed.
    pub fn upsert(&self, rule: RecurrenceRule) -> DatebookResult<bool> {
        if !rule.is_repeating() {
            tracing::debug!(event_id = rule.event_id, "Skipping non-repeating rule");
            return Ok(false);
        }

        let event_id = rule.event_id;
        self.table.mutate(|rows| {
            match rows.records.iter_mut().find(|r| r.event_id == event_id) {
                Some(existing) => *existing = rule,
                None => rows.records.push(rule),
            }
            Ok(Outcome::changed(true))
        })?;

        tracing::info!(event_id, "Saved recurrence rule");
        Ok(true)
    }

    /// Drop the rule for `event_id`. Returns whether one existed.
    pub fn remove(&self, event_id: u64) -> DatebookResult<bool> {
        self.table.mutate(|rows| {
            let before = rows.records.len();
            rows.records.retain(|r| r.event_id != event_id);
            Ok(if rows.records.len() != before {
                Outcome::changed(true)
            } else {
                Outcome::unchanged(false)
            })
        })
    }

    /// Every rule keyed by its event id.
    pub fn list(&self) -> BTreeMap<u64, RecurrenceRule> {
        self.table
            .all()
            .into_iter()
            .map(|rule| (rule.event_id, rule))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(dir: &tempfile::TempDir) -> RuleStore {
        RuleStore::open(dir.path().join(RuleStore::FILE_NAME)).unwrap()
    }

    #[test]
    fn test_upsert_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        let rule = RecurrenceRule::new(4, Interval::Weekly, 3);

        assert!(store.upsert(rule.clone()).unwrap());
        assert_eq!(store.get(4), Some(rule));
        assert_eq!(store.get(5), None);
    }

    #[test]
    fn test_upsert_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.upsert(RecurrenceRule::new(4, Interval::Weekly, 3)).unwrap();
        store.upsert(RecurrenceRule::new(4, Interval::Daily, 10)).unwrap();

        assert_eq!(store.list().len(), 1);
        assert_eq!(store.get(4).unwrap().interval, Interval::Daily);
    }

    #[test]
    fn test_non_repeating_upsert_keeps_existing_rule() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.upsert(RecurrenceRule::new(4, Interval::Monthly, 6)).unwrap();

        assert!(!store.upsert(RecurrenceRule::new(4, Interval::None, 5)).unwrap());
        assert!(!store.upsert(RecurrenceRule::new(4, Interval::Daily, 1)).unwrap());

        assert_eq!(store.get(4).unwrap().interval, Interval::Monthly);
    }

    #[test]
    fn test_non_repeating_upsert_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.upsert(RecurrenceRule::new(1, Interval::None, 3)).unwrap();
        assert!(!dir.path().join(RuleStore::FILE_NAME).exists());
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.upsert(RecurrenceRule::new(2, Interval::Yearly, 2)).unwrap();

        assert!(store.remove(2).unwrap());
        assert!(!store.remove(2).unwrap());
        assert!(store.get(2).is_none());
    }

    #[test]
    fn test_file_layout_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        {
            let store = open(&dir);
            store.upsert(RecurrenceRule::new(1, Interval::Daily, 3)).unwrap();
            store.upsert(RecurrenceRule::new(2, Interval::Weekly, 4).until(end)).unwrap();
        }

        let content = std::fs::read_to_string(dir.path().join(RuleStore::FILE_NAME)).unwrap();
        assert_eq!(
            content,
            "eventId,recurrentInterval,recurrentTimes,recurrentEndDate\n\
             1,1d,3,\n\
             2,1w,4,2026-06-30\n"
        );

        let reopened = open(&dir);
        assert_eq!(reopened.get(2).unwrap().end_date, Some(end));
        assert_eq!(reopened.get(1).unwrap().end_date, None);
    }

    #[test]
    fn test_reads_null_end_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RuleStore::FILE_NAME);
        std::fs::write(
            &path,
            "eventId,recurrentInterval,recurrentTimes,recurrentEndDate\n3,1m,12,null\n",
        )
        .unwrap();

        let store = RuleStore::open(&path).unwrap();
        assert_eq!(store.get(3).unwrap().end_date, None);
    }
}
