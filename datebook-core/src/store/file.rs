//! Reading and atomically rewriting CSV files.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::error::{DatebookError, DatebookResult};

/// Read every row of a headed CSV file.
///
/// A missing or empty file reads as no rows. Anything else that goes wrong
/// (permissions, malformed rows, unknown enum codes) is an error.
pub fn read_rows<R: DeserializeOwned>(path: &Path) -> DatebookResult<Vec<R>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }

    Ok(rows)
}

/// Exclusive lock on the `<file>.lock` sidecar of a table, released on drop.
pub struct WriteLock {
    _file: File,
}

/// Block until no other process (or store handle) is writing `path`.
pub fn lock_for_write(path: &Path) -> DatebookResult<WriteLock> {
    std::fs::create_dir_all(parent_dir(path)?)?;

    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path(path))?;
    file.lock_exclusive()?;

    Ok(WriteLock { _file: file })
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

fn parent_dir(path: &Path) -> DatebookResult<&Path> {
    path.parent()
        .ok_or_else(|| DatebookError::Storage(format!("{} has no parent directory", path.display())))
}

/// Replace `path` with a file holding `headers` followed by `rows`.
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over the target, so readers see either the old or the new file.
pub fn write_rows<R: Serialize>(path: &Path, headers: &[&str], rows: &[R]) -> DatebookResult<()> {
    let dir = parent_dir(path)?;
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file_mut());
        writer.write_record(headers)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|e| DatebookError::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u64,
        note: String,
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let rows: Vec<Row> = read_rows(&dir.path().join("nope.csv")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();
        let rows: Vec<Row> = read_rows(&path).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_header_written_without_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        write_rows::<Row>(&path, &["id", "note"], &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id,note\n");
    }

    #[test]
    fn test_embedded_commas_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let rows = vec![Row {
            id: 1,
            note: "milk, eggs, bread".to_string(),
        }];
        write_rows(&path, &["id", "note"], &rows).unwrap();
        let back: Vec<Row> = read_rows(&path).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_lock_sits_next_to_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");

        let lock = lock_for_write(&path).unwrap();
        assert!(dir.path().join("rows.csv.lock").exists());
        assert!(!path.exists());
        drop(lock);

        assert!(lock_for_write(&path).is_ok());
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "id,note\nabc,hello\n").unwrap();
        assert!(read_rows::<Row>(&path).is_err());
    }
}
