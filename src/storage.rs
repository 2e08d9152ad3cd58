//! Storage layer for trasker
//!
//! Every task lives in its own directory under the tasks root:
//!
//! ```text
//! .tasks/                       # Tasks root (created by `init`)
//!   20240131-093015/            # One directory per task, named by creation time
//!     TASK.md                   # Task document
//! ```
//!
//! Directory names double as task ids and sort chronologically.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::task::{self, TASK_FILE};

/// Timestamp format used for task directory names
pub const ID_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Storage manager for the tasks directory
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Create a storage manager rooted at the tasks directory itself
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    /// Path to the tasks root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to a task's directory
    pub fn task_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Path to a task's `TASK.md`
    pub fn task_file(&self, id: &str) -> PathBuf {
        self.task_dir(id).join(TASK_FILE)
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    pub fn is_initialized(&self) -> bool {
        self.root.is_dir()
    }

    /// Fail with `NotInitialized` unless the tasks root exists
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(Error::NotInitialized(self.root.clone()))
        }
    }

    /// Create the tasks root. Returns false if it already existed.
    pub fn init(&self) -> Result<bool> {
        if self.is_initialized() {
            return Ok(false);
        }
        fs::create_dir(&self.root)?;
        info!(root = %self.root.display(), "initialized tasks directory");
        Ok(true)
    }

    // =========================================================================
    // Task documents
    // =========================================================================

    /// Read every task document as `(id, contents)`, ordered by id.
    pub fn read_entries(&self) -> Result<Vec<(String, String)>> {
        self.ensure_initialized()?;

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            ids.push(entry.file_name().to_string_lossy().into_owned());
        }
        ids.sort();

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            let contents = self.read_task(&id)?;
            entries.push((id, contents));
        }
        debug!(count = entries.len(), "read task entries");
        Ok(entries)
    }

    pub fn read_task(&self, id: &str) -> Result<String> {
        Ok(fs::read_to_string(self.task_file(id))?)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.task_dir(id).exists()
    }

    /// Pick a free id for a task created at `now`, probing later seconds on collision.
    pub fn allocate_id(&self, now: NaiveDateTime) -> String {
        let mut at = now;
        loop {
            let id = at.format(ID_FORMAT).to_string();
            if !self.exists(&id) {
                return id;
            }
            at += Duration::seconds(1);
        }
    }

    /// Create a task directory holding the default template. Returns the new id.
    pub fn create_task(&self, now: NaiveDateTime) -> Result<String> {
        self.ensure_initialized()?;

        let id = self.allocate_id(now);
        fs::create_dir(self.task_dir(&id))?;
        fs::write(self.task_file(&id), task::default_template())?;
        info!(id = %id, "created task");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 31)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid time")
    }

    fn storage() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::new(dir.path().join(".tasks"));
        (dir, storage)
    }

    #[test]
    fn init_creates_root_once() {
        let (_dir, storage) = storage();
        assert!(!storage.is_initialized());
        assert!(storage.init().expect("init"));
        assert!(storage.is_initialized());
        assert!(!storage.init().expect("second init"));
    }

    #[test]
    fn uninitialized_operations_fail() {
        let (_dir, storage) = storage();
        assert!(matches!(storage.read_entries(), Err(Error::NotInitialized(_))));
        assert!(matches!(
            storage.create_task(at(9, 30, 15)),
            Err(Error::NotInitialized(_))
        ));
    }

    #[test]
    fn create_task_writes_template() {
        let (_dir, storage) = storage();
        storage.init().expect("init");

        let id = storage.create_task(at(9, 30, 15)).expect("create");
        assert_eq!(id, "20240131-093015");
        assert_eq!(
            storage.read_task(&id).expect("read"),
            task::default_template()
        );
    }

    #[test]
    fn same_second_probes_next_second() {
        let (_dir, storage) = storage();
        storage.init().expect("init");

        let first = storage.create_task(at(23, 59, 59)).expect("first");
        let second = storage.create_task(at(23, 59, 59)).expect("second");
        let third = storage.create_task(at(23, 59, 59)).expect("third");
        assert_eq!(first, "20240131-235959");
        assert_eq!(second, "20240201-000000");
        assert_eq!(third, "20240201-000001");
    }

    #[test]
    fn read_entries_sorted_and_skips_files() {
        let (_dir, storage) = storage();
        storage.init().expect("init");
        storage.create_task(at(12, 0, 0)).expect("create");
        storage.create_task(at(8, 0, 0)).expect("create");
        fs::write(storage.root().join("notes.txt"), "not a task").expect("write");

        let entries = storage.read_entries().expect("entries");
        let ids: Vec<&str> = entries.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["20240131-080000", "20240131-120000"]);
    }

    #[test]
    fn task_dir_without_document_is_an_error() {
        let (_dir, storage) = storage();
        storage.init().expect("init");
        fs::create_dir(storage.task_dir("20240131-000000")).expect("mkdir");

        assert!(matches!(storage.read_entries(), Err(Error::Io(_))));
    }
}
