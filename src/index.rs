//! In-memory task index.
//!
//! The index owns the only copy of every loaded [`Task`]. Category and status
//! buckets, and the display list from the last listing, hold task ids so
//! they can never drift from the owned records.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::task::{self, Category, Status, Task};

/// Which label column a width is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Category,
    Status,
}

#[derive(Debug, Default)]
pub struct TaskIndex {
    loaded: bool,
    tasks: Vec<Task>,
    by_category: HashMap<Category, Vec<String>>,
    by_status: HashMap<Status, Vec<String>>,
    display: Vec<String>,
    category_width: usize,
    status_width: usize,
}

impl TaskIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Populate the index from `(id, contents)` pairs.
    ///
    /// Does nothing once the index is loaded. The first malformed entry aborts
    /// the load and leaves the index empty.
    pub fn load_all<I, S, C>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, C)>,
        S: AsRef<str>,
        C: AsRef<str>,
    {
        if self.loaded {
            return Ok(());
        }

        let mut parsed = Vec::new();
        for (id, contents) in entries {
            parsed.push(task::parse(id.as_ref(), contents.as_ref())?);
        }

        self.reset();
        for task in parsed {
            self.upsert(task);
        }
        self.loaded = true;
        debug!(count = self.tasks.len(), "loaded tasks");
        Ok(())
    }

    /// Drop every task and mark the index unloaded.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Insert a new task or replace the fields of an existing one.
    pub fn upsert(&mut self, task: Task) {
        let Some(pos) = self.position(&task.id) else {
            debug!(id = %task.id, "adding task");
            push_id(&mut self.by_category, task.category, &task.id);
            push_id(&mut self.by_status, task.status, &task.id);
            self.tasks.push(task);
            self.refresh_widths();
            return;
        };

        let existing = &mut self.tasks[pos];
        if existing.category != task.category {
            remove_id(&mut self.by_category, existing.category, &task.id);
            push_id(&mut self.by_category, task.category, &task.id);
        }
        if existing.status != task.status {
            remove_id(&mut self.by_status, existing.status, &task.id);
            push_id(&mut self.by_status, task.status, &task.id);
        }
        debug!(id = %task.id, "updating task");
        *existing = task;
        self.refresh_widths();
    }

    /// Remove a task everywhere it is referenced. Returns false if it was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.position(id) else {
            self.display.retain(|entry| entry != id);
            return false;
        };

        let task = self.tasks.remove(pos);
        remove_id(&mut self.by_category, task.category, id);
        remove_id(&mut self.by_status, task.status, id);
        self.display.retain(|entry| entry != id);
        self.refresh_widths();
        debug!(id, "removed task");
        true
    }

    /// Widest label among loaded tasks, used to align listing columns.
    pub fn max_label_width(&self, kind: LabelKind) -> usize {
        match kind {
            LabelKind::Category => self.category_width,
            LabelKind::Status => self.status_width,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.position(id).map(|pos| &self.tasks[pos])
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Tasks in a category bucket, oldest membership first.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Task> {
        self.bucket_tasks(self.by_category.get(&category))
    }

    /// Tasks in a status bucket, oldest membership first.
    pub fn in_status(&self, status: Status) -> impl Iterator<Item = &Task> {
        self.bucket_tasks(self.by_status.get(&status))
    }

    pub fn display_list(&self) -> &[String] {
        &self.display
    }

    pub fn replace_display_list(&mut self, ids: Vec<String>) {
        self.display = ids;
    }

    /// Resolve a 1-based position from the last listing.
    pub fn resolve(&self, position: usize) -> Result<&Task> {
        let id = position
            .checked_sub(1)
            .and_then(|idx| self.display.get(idx))
            .ok_or_else(|| Error::InvalidIndex(position.to_string()))?;
        self.get(id)
            .ok_or_else(|| Error::InvalidIndex(position.to_string()))
    }

    fn bucket_tasks<'a>(&'a self, ids: Option<&'a Vec<String>>) -> impl Iterator<Item = &'a Task> {
        ids.into_iter()
            .flatten()
            .filter_map(move |id| self.get(id))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn refresh_widths(&mut self) {
        self.category_width = widest(&self.by_category, |c| c.label());
        self.status_width = widest(&self.by_status, |s| s.label());
    }
}

fn push_id<K: std::hash::Hash + Eq>(buckets: &mut HashMap<K, Vec<String>>, key: K, id: &str) {
    buckets.entry(key).or_default().push(id.to_string());
}

fn remove_id<K: std::hash::Hash + Eq>(buckets: &mut HashMap<K, Vec<String>>, key: K, id: &str) {
    if let Some(bucket) = buckets.get_mut(&key) {
        bucket.retain(|entry| entry != id);
        if bucket.is_empty() {
            buckets.remove(&key);
        }
    }
}

fn widest<K: Copy>(buckets: &HashMap<K, Vec<String>>, label: impl Fn(K) -> &'static str) -> usize {
    buckets
        .iter()
        .filter(|(_, ids)| !ids.is_empty())
        .map(|(key, _)| label(*key).len())
        .max()
        .unwrap_or(0)
}
