//! In-memory record table mirrored to one CSV file.

use std::path::PathBuf;

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::file::{lock_for_write, read_rows, write_rows};
use super::id::IdAllocator;
use crate::error::DatebookResult;

/// A record type that can live in a [`CsvTable`].
pub trait Record: Clone {
    /// On-disk representation, one CSV line.
    type Row: Serialize + DeserializeOwned;

    const HEADERS: &'static [&'static str];

    fn key(&self) -> u64;
    fn to_row(&self) -> Self::Row;
    fn from_row(row: Self::Row) -> Self;
}

/// Result of a mutation closure: the value to hand back, and whether the
/// records changed and need flushing.
pub struct Outcome<T> {
    pub value: T,
    pub changed: bool,
}

impl<T> Outcome<T> {
    pub fn changed(value: T) -> Self {
        Outcome {
            value,
            changed: true,
        }
    }

    pub fn unchanged(value: T) -> Self {
        Outcome {
            value,
            changed: false,
        }
    }
}

pub struct Rows<R> {
    pub records: Vec<R>,
    pub ids: IdAllocator,
}

/// Records held in memory behind a single-writer lock.
///
/// Every mutation holds an exclusive lock on the file, reloads it so writes
/// from other handles or processes are seen, applies the change to that
/// copy, writes it out atomically, and only then swaps it in. A failed write
/// leaves the table untouched.
pub struct CsvTable<R: Record> {
    path: PathBuf,
    rows: RwLock<Rows<R>>,
}

impl<R: Record> CsvTable<R> {
    pub fn open(path: impl Into<PathBuf>) -> DatebookResult<Self> {
        let path = path.into();
        let records: Vec<R> = read_rows::<R::Row>(&path)?
            .into_iter()
            .map(R::from_row)
            .collect();
        let ids = IdAllocator::seeded(records.iter().map(Record::key));

        tracing::debug!(path = %path.display(), records = records.len(), "Opened table");

        Ok(CsvTable {
            path,
            rows: RwLock::new(Rows { records, ids }),
        })
    }

    pub fn all(&self) -> Vec<R> {
        self.rows.read().records.clone()
    }

    pub fn find(&self, pred: impl Fn(&R) -> bool) -> Option<R> {
        self.rows.read().records.iter().find(|r| pred(r)).cloned()
    }

    pub fn filter(&self, pred: impl Fn(&R) -> bool) -> Vec<R> {
        self.rows
            .read()
            .records
            .iter()
            .filter(|r| pred(r))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` against a fresh copy of the rows while holding both the
    /// in-process write lock and the file lock.
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Rows<R>) -> DatebookResult<Outcome<T>>,
    ) -> DatebookResult<T> {
        let mut guard = self.rows.write();
        let _lock = lock_for_write(&self.path)?;
        let mut draft = self.reload(&guard)?;

        let outcome = f(&mut draft)?;
        if outcome.changed {
            self.flush(&draft.records)?;
        }
        *guard = draft;

        Ok(outcome.value)
    }

    /// Current file contents, keeping this handle's id high-water mark.
    fn reload(&self, current: &Rows<R>) -> DatebookResult<Rows<R>> {
        let records: Vec<R> = read_rows::<R::Row>(&self.path)?
            .into_iter()
            .map(R::from_row)
            .collect();

        let mut ids = current.ids;
        for record in &records {
            ids.observe(record.key());
        }

        Ok(Rows { records, ids })
    }

    fn flush(&self, records: &[R]) -> DatebookResult<()> {
        let rows: Vec<R::Row> = records.iter().map(Record::to_row).collect();
        write_rows(&self.path, R::HEADERS, &rows).inspect_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to write table");
        })
    }
}
