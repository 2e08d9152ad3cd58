//! External processes the shell hands control to.
//!
//! Editing and deleting both block on a child process that owns the terminal.
//! They sit behind traits so the shell can be driven without spawning anything.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::error::{Error, Result};

/// Editor used when neither config nor environment names one
pub const FALLBACK_EDITOR: &str = "vim";

/// Opens a file for interactive editing and returns once the user is done.
pub trait Editor {
    fn edit(&self, path: &Path) -> Result<()>;
}

/// Deletes a task directory after the user confirms.
pub trait Remover {
    /// Returns true if `path` no longer exists afterwards.
    fn confirm_and_delete(&self, path: &Path) -> Result<bool>;
}

/// Launches `$VISUAL`/`$EDITOR` (or a configured command) with inherited stdio.
#[derive(Debug, Clone, Default)]
pub struct SystemEditor {
    configured: Option<String>,
}

impl SystemEditor {
    pub fn new(configured: Option<String>) -> Self {
        Self { configured }
    }

    fn candidates(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(value) = &self.configured {
            out.push(value.clone());
        }
        for var in ["VISUAL", "EDITOR"] {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    out.push(value);
                }
            }
        }
        out.push(FALLBACK_EDITOR.to_string());
        out
    }
}

impl Editor for SystemEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        let mut attempted: Vec<String> = Vec::new();
        for candidate in self.candidates() {
            let parts: Vec<&str> = candidate.split_whitespace().collect();
            let Some((program, args)) = parts.split_first() else {
                continue;
            };
            attempted.push(program.to_string());
            debug!(editor = %candidate, path = %path.display(), "launching editor");
            match Command::new(program).args(args).arg(path).status() {
                Ok(status) => return check_status(program, status),
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => {
                    return Err(Error::EditorFailed(format!(
                        "failed to launch editor '{program}': {err}"
                    )));
                }
            }
        }
        Err(Error::EditorFailed(format!(
            "no editor found (tried {})",
            attempted.join(", ")
        )))
    }
}

fn check_status(program: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    let detail = status
        .code()
        .map(|code| format!("exit code {code}"))
        .unwrap_or_else(|| "signal".to_string());
    Err(Error::EditorFailed(format!("'{program}' exited with {detail}")))
}

/// Runs `rm --recursive --interactive=once`, letting the user confirm on the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractiveRemover;

impl Remover for InteractiveRemover {
    fn confirm_and_delete(&self, path: &Path) -> Result<bool> {
        let status = Command::new("rm")
            .arg("--recursive")
            .arg("--interactive=once")
            .arg(path)
            .status()?;
        debug!(path = %path.display(), success = status.success(), "rm finished");
        Ok(!path.exists())
    }
}
