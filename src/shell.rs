//! The interactive command loop.
//!
//! A [`Shell`] owns the task index and dispatches one input line at a time.
//! Errors from a command are reported and the loop keeps going; only `exit`
//! or the end of input stops it.

use std::io::{BufRead, Write};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::external::{Editor, Remover};
use crate::index::TaskIndex;
use crate::output::write_error;
use crate::render::{self, ListMode};
use crate::storage::Storage;
use crate::task;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const HELP: &str = "\
COMMANDS
  init                               initialize Trasker in current directory
  new                                create and edit a new task
  ls                                 list all tasks
    [CATEGORY|STATUS]                list tasks grouped by category/status
    [TODO|FIX|PERF|SPIKE]            list tasks filtered by given category
    [ACTIVE|COMPLETED|DROPPED]       list tasks filtered by given status
  edit <index>                       edit mentioned task from list (see `ls`)
  rm <index>                         delete mentioned task from list (see `ls`)
  cat <index>                        display mentioned task from list (see `ls`)
  cls                                clear the screen
  help                               display this help
  version                            print the version
  exit                               exit the program";

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell<E, R, W> {
    storage: Storage,
    index: TaskIndex,
    editor: E,
    remover: R,
    out: W,
    prompt: String,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl<E: Editor, R: Remover, W: Write> Shell<E, R, W> {
    pub fn new(storage: Storage, editor: E, remover: R, out: W) -> Self {
        Self {
            storage,
            index: TaskIndex::new(),
            editor,
            remover,
            out,
            prompt: "> ".to_string(),
            clock: local_now,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Override the time source used to name new tasks.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn index(&self) -> &TaskIndex {
        &self.index
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read and execute lines until `exit` or end of input.
    ///
    /// Only failures to read input or write output end the loop with an error.
    pub fn run<B: BufRead>(&mut self, mut input: B) -> Result<()> {
        loop {
            write!(self.out, "{}", self.prompt)?;
            self.out.flush()?;

            let mut raw = Vec::new();
            if input.read_until(b'\n', &mut raw)? == 0 {
                writeln!(self.out)?;
                return Ok(());
            }
            let line = String::from_utf8_lossy(&raw);

            match self.execute(&line) {
                Ok(Flow::Exit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(err) => self.report(&err)?,
            }
        }
    }

    /// Report a command failure on the shell output.
    pub fn report(&mut self, err: &Error) -> Result<()> {
        if !err.is_recoverable() {
            warn!(error = %err, "command failed");
        }
        write_error(&mut self.out, err)
    }

    /// Execute a single input line.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Ok(Flow::Continue);
        };
        let args: Vec<&str> = parts.collect();
        debug!(command, ?args, "executing");

        match command {
            "init" => self.init()?,
            "new" => self.create()?,
            "ls" => self.list(&args)?,
            "edit" => self.edit(&args)?,
            "rm" => self.delete(&args)?,
            "cat" => self.show(&args)?,
            "cls" => {
                write!(self.out, "{CLEAR_SCREEN}")?;
                self.out.flush()?;
            }
            "help" => writeln!(self.out, "{HELP}")?,
            "version" => writeln!(self.out, "{}", env!("CARGO_PKG_VERSION"))?,
            "exit" => return Ok(Flow::Exit),
            other => return Err(Error::UnknownCommand(other.to_string())),
        }
        Ok(Flow::Continue)
    }

    /// Load the index and number tasks as a plain `ls` would, without printing.
    ///
    /// Lets a one-shot `edit`/`rm`/`cat` refer to positions of the default listing.
    pub fn prime_display_list(&mut self) -> Result<()> {
        self.storage.ensure_initialized()?;
        self.load()?;
        let listing = render::render(&self.index, ListMode::default());
        self.index.replace_display_list(listing.display_ids());
        Ok(())
    }

    fn load(&mut self) -> Result<()> {
        if self.index.is_loaded() {
            return Ok(());
        }
        let entries = self.storage.read_entries()?;
        self.index.load_all(entries)
    }

    fn init(&mut self) -> Result<()> {
        let name = self.root_name();
        if self.storage.init()? {
            writeln!(self.out, "Trasker initialized.")?;
        } else {
            writeln!(
                self.out,
                "`{name}` directory already exists. Skipping initialization."
            )?;
        }
        Ok(())
    }

    fn create(&mut self) -> Result<()> {
        self.storage.ensure_initialized()?;
        self.load()?;

        let id = self.storage.create_task((self.clock)())?;
        self.edit_and_reload(&id)?;
        writeln!(self.out, "Task `{id}` created successfully.")?;
        Ok(())
    }

    fn list(&mut self, args: &[&str]) -> Result<()> {
        self.storage.ensure_initialized()?;
        let mode = ListMode::from_args(args)?;
        self.load()?;

        let listing = render::render(&self.index, mode);
        write!(self.out, "{listing}")?;
        self.index.replace_display_list(listing.display_ids());
        Ok(())
    }

    fn edit(&mut self, args: &[&str]) -> Result<()> {
        self.storage.ensure_initialized()?;
        let id = self.selected(args, "index of task to edit")?;

        self.edit_and_reload(&id)?;
        writeln!(self.out, "Task `{id}` updated successfully.")?;
        Ok(())
    }

    fn delete(&mut self, args: &[&str]) -> Result<()> {
        self.storage.ensure_initialized()?;
        let id = self.selected(args, "index of task to delete")?;

        let dir = self.storage.task_dir(&id);
        let confirmed = self.remover.confirm_and_delete(&dir)?;
        if confirmed && !self.storage.exists(&id) {
            self.index.remove(&id);
            writeln!(self.out, "Task `{id}` deleted successfully.")?;
        } else {
            writeln!(
                self.out,
                "Skipped deleting task. HINT: Enter `y` on deletion confirmation."
            )?;
        }
        Ok(())
    }

    fn show(&mut self, args: &[&str]) -> Result<()> {
        self.storage.ensure_initialized()?;
        let id = self.selected(args, "index of task to display")?;

        let contents = self.storage.read_task(&id)?;
        if contents.ends_with('\n') {
            write!(self.out, "{contents}")?;
        } else {
            writeln!(self.out, "{contents}")?;
        }
        Ok(())
    }

    /// Open the task in the editor, then re-read it even if the editor failed,
    /// since the file on disk may already have changed.
    fn edit_and_reload(&mut self, id: &str) -> Result<()> {
        let edited = self.editor.edit(&self.storage.task_file(id));
        let reloaded = self.reload_task(id);
        if let (Err(_), Err(reload_err)) = (&edited, &reloaded) {
            warn!(id, error = %reload_err, "task left unreadable after editor failure");
        }
        edited?;
        reloaded
    }

    fn reload_task(&mut self, id: &str) -> Result<()> {
        let contents = self.storage.read_task(id)?;
        let task = task::parse(id, &contents)?;
        self.index.upsert(task);
        Ok(())
    }

    /// Resolve the single positional argument against the last listing.
    fn selected(&self, args: &[&str], what: &'static str) -> Result<String> {
        let position = match args {
            [] => return Err(Error::MissingArgument(what)),
            [raw] => raw
                .parse::<usize>()
                .map_err(|_| Error::InvalidIndex(raw.to_string()))?,
            _ => return Err(Error::InvalidIndex(args.join(" "))),
        };
        Ok(self.index.resolve(position)?.id.clone())
    }

    fn root_name(&self) -> String {
        self.storage
            .root()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.storage.root().display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct NoEditor;

    impl Editor for NoEditor {
        fn edit(&self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    struct NoRemover;

    impl Remover for NoRemover {
        fn confirm_and_delete(&self, _path: &Path) -> Result<bool> {
            Ok(false)
        }
    }

    fn shell(dir: &Path) -> Shell<NoEditor, NoRemover, Vec<u8>> {
        Shell::new(Storage::new(dir.join(".tasks")), NoEditor, NoRemover, Vec::new())
    }

    fn output(shell: Shell<NoEditor, NoRemover, Vec<u8>>) -> String {
        String::from_utf8(shell.into_output()).expect("utf8")
    }

    #[test]
    fn blank_line_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut shell = shell(dir.path());
        assert_eq!(shell.execute("   \n").expect("blank"), Flow::Continue);
        assert!(output(shell).is_empty());
    }

    #[test]
    fn unknown_command_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut shell = shell(dir.path());
        assert!(matches!(
            shell.execute("frobnicate"),
            Err(Error::UnknownCommand(cmd)) if cmd == "frobnicate"
        ));
    }

    #[test]
    fn index_argument_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut shell = shell(dir.path());
        shell.execute("init").expect("init");

        assert!(matches!(shell.execute("edit"), Err(Error::MissingArgument(_))));
        assert!(matches!(shell.execute("cat one"), Err(Error::InvalidIndex(_))));
        assert!(matches!(shell.execute("rm 1 2"), Err(Error::InvalidIndex(_))));
        assert!(matches!(shell.execute("cat 0"), Err(Error::InvalidIndex(_))));
        assert!(matches!(shell.execute("cat 1"), Err(Error::InvalidIndex(_))));
    }

    #[test]
    fn commands_require_init() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut shell = shell(dir.path());
        for line in ["new", "ls", "edit 1", "rm 1", "cat 1"] {
            assert!(
                matches!(shell.execute(line), Err(Error::NotInitialized(_))),
                "{line} should require init"
            );
        }
        assert_eq!(shell.execute("help").expect("help"), Flow::Continue);
        assert_eq!(shell.execute("exit").expect("exit"), Flow::Exit);
    }

    #[test]
    fn init_twice_reports_existing_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut shell = shell(dir.path());
        shell.execute("init").expect("init");
        shell.execute("init").expect("init again");
        assert_eq!(
            output(shell),
            "Trasker initialized.\n`.tasks` directory already exists. Skipping initialization.\n"
        );
    }

    #[test]
    fn version_and_cls() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut shell = shell(dir.path());
        shell.execute("version").expect("version");
        shell.execute("cls").expect("cls");
        assert_eq!(
            output(shell),
            format!("{}\n{CLEAR_SCREEN}", env!("CARGO_PKG_VERSION"))
        );
    }
}
