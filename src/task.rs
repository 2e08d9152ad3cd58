//! Task records and the `TASK.md` format.
//!
//! Every task file has the same fixed layout:
//!
//! ```text
//! # <name>
//!
//! - CATEGORY: <token>
//! - STATUS: <token>
//!
//! <description...>
//! ```
//!
//! Tokens outside the known set are kept as `Unrecognized` so hand edits never
//! make a task disappear from the store.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// File name of the task document inside each task directory
pub const TASK_FILE: &str = "TASK.md";

const NAME_PREFIX: &str = "# ";
const CATEGORY_PREFIX: &str = "- CATEGORY: ";
const STATUS_PREFIX: &str = "- STATUS: ";
const MIN_LINES: usize = 4;
const DESCRIPTION_LINE: usize = 5;

const DEFAULT_NAME: &str = "New Task";
const DEFAULT_DESCRIPTION: &str = "This is a new task.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Todo,
    Fix,
    Perf,
    Spike,
    Unrecognized,
}

impl Category {
    /// Recognized categories in display order.
    pub const ALL: [Category; 4] = [Category::Todo, Category::Fix, Category::Perf, Category::Spike];

    pub fn label(self) -> &'static str {
        match self {
            Category::Todo => "TODO",
            Category::Fix => "FIX",
            Category::Perf => "PERF",
            Category::Spike => "SPIKE",
            Category::Unrecognized => "",
        }
    }

    /// Map a stored token, falling back to `Unrecognized`.
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or(Category::Unrecognized)
    }

    /// All recognized tokens joined with `|`, as advertised in new task files.
    pub fn options() -> String {
        join_labels(Self::ALL.iter().map(|c| c.label()))
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| Error::UnknownFilter(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Active,
    Completed,
    Dropped,
    Unrecognized,
}

impl Status {
    /// Recognized statuses in display order.
    pub const ALL: [Status; 3] = [Status::Active, Status::Completed, Status::Dropped];

    pub fn label(self) -> &'static str {
        match self {
            Status::Active => "ACTIVE",
            Status::Completed => "COMPLETED",
            Status::Dropped => "DROPPED",
            Status::Unrecognized => "",
        }
    }

    /// Map a stored token, falling back to `Unrecognized`.
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or(Status::Unrecognized)
    }

    pub fn options() -> String {
        join_labels(Self::ALL.iter().map(|s| s.label()))
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| Error::UnknownFilter(s.to_string()))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join("|")
}

/// One task as loaded from its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Directory name (`YYYYMMDD-HHMMSS`); never changes once created
    pub id: String,
    pub name: String,
    pub category: Category,
    pub status: Status,
    pub description: String,
}

/// Parse the contents of a `TASK.md` belonging to task `id`.
pub fn parse(id: &str, contents: &str) -> Result<Task> {
    let lines: Vec<&str> = contents
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    if lines.len() < MIN_LINES {
        return Err(malformed(
            id,
            format!("expected at least {MIN_LINES} lines, found {}", lines.len()),
        ));
    }

    let name = header_value(id, &lines, 0, NAME_PREFIX)?;
    let category = header_value(id, &lines, 2, CATEGORY_PREFIX)?;
    let status = header_value(id, &lines, 3, STATUS_PREFIX)?;

    let description = lines
        .get(DESCRIPTION_LINE..)
        .map(|rest| rest.join("\n"))
        .unwrap_or_default();

    Ok(Task {
        id: id.to_string(),
        name: name.to_string(),
        category: Category::from_token(category.trim_end()),
        status: Status::from_token(status.trim_end()),
        description: description
            .trim_matches(|c| c == '\n' || c == '\r' || c == ' ')
            .to_string(),
    })
}

fn header_value<'a>(id: &str, lines: &[&'a str], line: usize, prefix: &str) -> Result<&'a str> {
    lines[line].strip_prefix(prefix).ok_or_else(|| {
        malformed(
            id,
            format!("line {} must start with `{}`", line + 1, prefix.trim_end()),
        )
    })
}

fn malformed(id: &str, reason: String) -> Error {
    Error::MalformedRecord {
        id: id.to_string(),
        reason,
    }
}

/// Render a task document; the inverse of [`parse`].
pub fn render_template(name: &str, category: &str, status: &str, description: &str) -> String {
    format!(
        "{NAME_PREFIX}{name}\n\n{CATEGORY_PREFIX}{category}\n{STATUS_PREFIX}{status}\n\n{description}"
    )
}

/// The document written for a freshly created task.
pub fn default_template() -> String {
    render_template(
        DEFAULT_NAME,
        &Category::options(),
        &Status::options(),
        DEFAULT_DESCRIPTION,
    )
}
