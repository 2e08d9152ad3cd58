//! Error types for trasker
//!
//! Exit codes (one-shot mode only; the shell never exits on an error):
//! - 0: Success
//! - 2: User error (bad index, bad filter, missing `.tasks`)
//! - 4: Operation failed (malformed task file, IO, editor)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the trasker CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for trasker operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("`{}` directory not found", .0.display())]
    NotInitialized(PathBuf),

    #[error("Invalid index provided: {0}")]
    InvalidIndex(String),

    #[error("Unknown filter for `ls`: {0}")]
    UnknownFilter(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Unknown command: `{0}`")]
    UnknownCommand(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("Malformed task `{id}`: {reason}")]
    MalformedRecord { id: String, reason: String },

    #[error("Editor failed: {0}")]
    EditorFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::NotInitialized(_)
            | Error::InvalidIndex(_)
            | Error::UnknownFilter(_)
            | Error::MissingArgument(_)
            | Error::UnknownCommand(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            // Operation failures
            Error::MalformedRecord { .. }
            | Error::EditorFailed(_)
            | Error::Io(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Whether the error was caused by user input rather than the store.
    pub fn is_recoverable(&self) -> bool {
        self.exit_code() == exit_codes::USER_ERROR
    }

    /// Follow-up suggestion printed under the error message.
    pub fn hint(&self) -> Option<String> {
        match self {
            Error::NotInitialized(_) => Some("run `init` to set up Trasker in this project".to_string()),
            Error::InvalidIndex(_) => Some("run `ls` and use a listed index".to_string()),
            Error::UnknownFilter(_) | Error::UnknownCommand(_) | Error::MissingArgument(_) => {
                Some("check `help` for correct usage".to_string())
            }
            Error::MalformedRecord { .. } => Some(
                "each TASK.md needs `# <name>`, a blank line, `- CATEGORY: <token>` and `- STATUS: <token>`"
                    .to_string(),
            ),
            Error::EditorFailed(_) => Some("set $VISUAL or $EDITOR, or `editor` in .trasker.toml".to_string()),
            _ => None,
        }
    }
}

/// Result type alias for trasker operations
pub type Result<T> = std::result::Result<T, Error>;
