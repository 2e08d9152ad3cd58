//! Shared message formatting for shell and one-shot commands.

use std::io::Write;

use crate::error::{Error, Result};

/// Format an error the way both the shell and one-shot mode print it.
pub fn format_error(err: &Error) -> String {
    let mut lines = vec![format!("error: {err}")];
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    lines.join("\n")
}

/// Write an error to the shell's output stream.
pub fn write_error<W: Write>(out: &mut W, err: &Error) -> Result<()> {
    writeln!(out, "{}", format_error(err))?;
    Ok(())
}

/// Print an error for a one-shot command to stderr.
pub fn emit_error(err: &Error) {
    eprintln!("{}", format_error(err));
}
