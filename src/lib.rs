//! trasker - Task Tracker Library
//!
//! This library provides the core of the trasker shell: a small task store
//! kept as one markdown file per task directory, and an in-memory index that
//! groups tasks for listing.
//!
//! # Core Concepts
//!
//! - **Task**: a `TASK.md` with a name, a category, a status and a description
//! - **Index**: owns loaded tasks and keeps category/status buckets in sync
//! - **Listing**: grouped or filtered rows numbered for `edit`/`rm`/`cat`
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.trasker.toml`
//! - `error`: Error types and result aliases
//! - `external`: Editor and delete-confirmation processes
//! - `index`: In-memory task index
//! - `output`: Error message formatting
//! - `render`: Listing modes and row formatting
//! - `shell`: Interactive command loop
//! - `storage`: Task directory layout
//! - `task`: `TASK.md` parsing and templates

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod index;
pub mod output;
pub mod render;
pub mod shell;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
