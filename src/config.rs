//! Configuration loading and management
//!
//! Handles parsing of `.trasker.toml` configuration files.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = ".trasker.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory (relative to the working directory) holding one subdirectory per task
    #[serde(default = "default_tasks_dir")]
    pub tasks_dir: String,

    /// Editor command used by `new` and `edit`; falls back to $VISUAL/$EDITOR
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Prompt printed before each shell command
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_dir: default_tasks_dir(),
            editor: None,
            prompt: default_prompt(),
        }
    }
}

fn default_tasks_dir() -> String {
    ".tasks".to_string()
}

fn default_prompt() -> String {
    "> ".to_string()
}

impl Config {
    /// Load configuration from a `.trasker.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the working directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Absolute location of the tasks directory under `dir`
    pub fn tasks_root(&self, dir: &Path) -> PathBuf {
        dir.join(&self.tasks_dir)
    }

    fn validate(&self) -> Result<()> {
        let tasks_dir = self.tasks_dir.trim();
        if tasks_dir.is_empty() {
            return Err(Error::InvalidConfig("tasks_dir cannot be empty".to_string()));
        }
        let mut components = Path::new(tasks_dir).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => {
                return Err(Error::InvalidConfig(format!(
                    "tasks_dir '{tasks_dir}' must be a single directory name"
                )));
            }
        }

        if let Some(editor) = &self.editor {
            if editor.trim().is_empty() {
                return Err(Error::InvalidConfig("editor cannot be empty".to_string()));
            }
        }

        Ok(())
    }
}
