#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;
use trasker::error::Error;
use trasker::external::{Editor, Remover};
use trasker::shell::Shell;
use trasker::storage::Storage;
use trasker::task;

pub type TestShell = Shell<ScriptedEditor, ScriptedRemover, Vec<u8>>;

/// A scratch project directory with an initialized `.tasks` root.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        fs::create_dir(dir.path().join(".tasks")).expect("create .tasks");
        Self { dir }
    }

    pub fn uninitialized() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_root(&self) -> PathBuf {
        self.dir.path().join(".tasks")
    }

    pub fn write_raw(&self, id: &str, contents: &str) -> PathBuf {
        let task_dir = self.tasks_root().join(id);
        fs::create_dir_all(&task_dir).expect("create task dir");
        let path = task_dir.join(task::TASK_FILE);
        fs::write(&path, contents).expect("write task");
        path
    }

    pub fn write_task(&self, id: &str, name: &str, category: &str, status: &str) -> PathBuf {
        self.write_raw(
            id,
            &task::render_template(name, category, status, "Some details."),
        )
    }

    pub fn shell(&self, editor: ScriptedEditor, remover: ScriptedRemover) -> TestShell {
        Shell::new(Storage::new(self.tasks_root()), editor, remover, Vec::new())
            .with_clock(fixed_now)
    }
}

pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 31)
        .and_then(|d| d.and_hms_opt(9, 30, 15))
        .expect("valid time")
}

/// Drain everything the shell has written so far.
pub fn take_output(shell: &mut TestShell) -> String {
    let bytes = std::mem::take(shell.output_mut());
    String::from_utf8(bytes).expect("utf8 output")
}

/// Editor that overwrites the file with queued documents, one per call.
#[derive(Clone, Default)]
pub struct ScriptedEditor {
    documents: Rc<RefCell<VecDeque<String>>>,
    opened: Rc<RefCell<Vec<PathBuf>>>,
    fail_next: Rc<Cell<bool>>,
}

impl ScriptedEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self, document: impl Into<String>) {
        self.documents.borrow_mut().push_back(document.into());
    }

    /// Make the next call write its document and then report failure.
    pub fn fail_after_writing(&self) {
        self.fail_next.set(true);
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.borrow().clone()
    }
}

impl Editor for ScriptedEditor {
    fn edit(&self, path: &Path) -> trasker::Result<()> {
        self.opened.borrow_mut().push(path.to_path_buf());
        if let Some(document) = self.documents.borrow_mut().pop_front() {
            fs::write(path, document)?;
        }
        if self.fail_next.replace(false) {
            return Err(Error::EditorFailed("editor exited with status 1".to_string()));
        }
        Ok(())
    }
}

/// Remover that answers the confirmation prompt with a queued yes/no.
#[derive(Clone, Default)]
pub struct ScriptedRemover {
    answers: Rc<RefCell<VecDeque<bool>>>,
}

impl ScriptedRemover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&self, confirm: bool) {
        self.answers.borrow_mut().push_back(confirm);
    }
}

impl Remover for ScriptedRemover {
    fn confirm_and_delete(&self, path: &Path) -> trasker::Result<bool> {
        let confirm = self.answers.borrow_mut().pop_front().unwrap_or(false);
        if confirm {
            fs::remove_dir_all(path)?;
        }
        Ok(!path.exists())
    }
}
