//! Listing output for `ls`.
//!
//! Rendering is pure: it reads the index and returns the rows along with the
//! ids they were numbered for. The caller commits those ids as the new display
//! list, so a rejected filter never disturbs positions from the last listing.

use std::fmt;

use crate::error::{Error, Result};
use crate::index::{LabelKind, TaskIndex};
use crate::task::{Category, Status, Task};

/// More tasks than this widens the position column to two digits.
const NARROW_POSITION_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    #[default]
    ByStatus,
    ByCategory,
    FilterStatus(Status),
    FilterCategory(Category),
}

impl ListMode {
    /// Interpret the arguments given to `ls`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        match args {
            [] => Ok(ListMode::ByStatus),
            [token] => Self::from_token(token.as_ref()),
            _ => Err(Error::UnknownFilter(
                args.iter()
                    .map(AsRef::<str>::as_ref)
                    .collect::<Vec<&str>>()
                    .join(" "),
            )),
        }
    }

    fn from_token(token: &str) -> Result<Self> {
        match token {
            "STATUS" => Ok(ListMode::ByStatus),
            "CATEGORY" => Ok(ListMode::ByCategory),
            _ => token
                .parse::<Status>()
                .map(ListMode::FilterStatus)
                .or_else(|_| token.parse::<Category>().map(ListMode::FilterCategory)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub position: usize,
    pub id: String,
    pub label: &'static str,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingGroup {
    pub header: String,
    pub rows: Vec<ListingRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub groups: Vec<ListingGroup>,
    position_width: usize,
    label_width: usize,
}

impl Listing {
    /// Ids in the order they were numbered.
    pub fn display_ids(&self) -> Vec<String> {
        self.rows().map(|row| row.id.clone()).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &ListingRow> {
        self.groups.iter().flat_map(|group| group.rows.iter())
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for group in &self.groups {
            lines.push(group.header.clone());
            for row in &group.rows {
                lines.push(format!(
                    "{:>pw$} - {} | {:<lw$} | {}",
                    row.position,
                    row.id,
                    row.label,
                    row.name,
                    pw = self.position_width,
                    lw = self.label_width,
                ));
            }
        }
        lines
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Build the listing for `mode` from the current index contents.
pub fn render(index: &TaskIndex, mode: ListMode) -> Listing {
    let position_width = if index.len() > NARROW_POSITION_LIMIT { 2 } else { 1 };

    let (groups, label_kind): (Vec<(&str, Vec<&Task>)>, LabelKind) = match mode {
        ListMode::ByStatus => (
            Status::ALL
                .iter()
                .map(|status| (status.label(), index.in_status(*status).collect()))
                .collect(),
            LabelKind::Category,
        ),
        ListMode::ByCategory => (
            Category::ALL
                .iter()
                .map(|category| (category.label(), index.in_category(*category).collect()))
                .collect(),
            LabelKind::Status,
        ),
        ListMode::FilterStatus(status) => (
            vec![(status.label(), index.in_status(status).collect())],
            LabelKind::Category,
        ),
        ListMode::FilterCategory(category) => (
            vec![(category.label(), index.in_category(category).collect())],
            LabelKind::Status,
        ),
    };

    let mut position = 0;
    let groups = groups
        .into_iter()
        .map(|(label, tasks)| ListingGroup {
            header: format!("{label} Tasks:"),
            rows: tasks
                .into_iter()
                .map(|task| {
                    position += 1;
                    ListingRow {
                        position,
                        id: task.id.clone(),
                        label: secondary_label(task, label_kind),
                        name: task.name.clone(),
                    }
                })
                .collect(),
        })
        .collect();

    Listing {
        groups,
        position_width,
        label_width: index.max_label_width(label_kind),
    }
}

fn secondary_label(task: &Task, kind: LabelKind) -> &'static str {
    match kind {
        LabelKind::Category => task.category.label(),
        LabelKind::Status => task.status.label(),
    }
}
