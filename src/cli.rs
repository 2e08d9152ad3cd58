//! Command-line entry point for trasker
//!
//! Without a command the interactive shell reads from stdin. Any trailing
//! words are run as a single shell command instead.

use std::io;
use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::error::Result;
use crate::external::{InteractiveRemover, SystemEditor};
use crate::shell::Shell;
use crate::storage::Storage;

/// trasker - track small tasks as markdown files in `.tasks/`
#[derive(Parser, Debug)]
#[command(name = "trasker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory holding `.tasks` (defaults to current directory)
    #[arg(long, env = "TRASKER_DIR")]
    pub dir: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Run a single shell command (e.g. `ls FIX`) instead of the interactive shell
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let dir = match self.dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let config = Config::load_from_dir(&dir);
        let storage = Storage::new(config.tasks_root(&dir));
        let editor = SystemEditor::new(config.editor.clone());

        let mut shell = Shell::new(storage, editor, InteractiveRemover, io::stdout())
            .with_prompt(config.prompt.clone());

        if self.command.is_empty() {
            return shell.run(io::stdin().lock());
        }

        let line = self.command.join(" ");
        if needs_listing(&self.command[0]) {
            shell.prime_display_list()?;
        }
        shell.execute(&line)?;
        Ok(())
    }
}

fn needs_listing(command: &str) -> bool {
    matches!(command, "edit" | "rm" | "cat")
}
