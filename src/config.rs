//! Configuration for the repository core and its logging.
//!
//! Loaded from a TOML file such as:
//!
//! ```toml
//! [git]
//! show_untracked = true
//! executable = "git"
//! max_untracked_size = 1048576
//!
//! [logger]
//! level = "debug"
//! file_path = "/home/me/.git-scribe.log"
//! format = "json"
//! ```

use crate::error::GitError;
use crate::types::Result;
use crate::untracked::DEFAULT_MAX_UNTRACKED_SIZE;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding [`LoggerConfig::level`].
pub const LOG_LEVEL_ENV: &str = "GIT_SCRIBE_LOG_LEVEL";
/// Environment variable overriding [`LoggerConfig::file_path`].
pub const LOG_FILE_ENV: &str = "GIT_SCRIBE_LOG_FILE";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub git: GitConfig,
    pub logger: LoggerConfig,
}

/// Settings for talking to git.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Whether callers should include untracked files in their views.
    pub show_untracked: bool,
    /// The git executable to invoke.
    pub executable: String,
    /// Untracked files above this many bytes are shown as binary placeholders.
    pub max_untracked_size: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            show_untracked: true,
            executable: "git".to_string(),
            max_untracked_size: DEFAULT_MAX_UNTRACKED_SIZE,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines, one object per event.
    #[default]
    Json,
    /// Human-readable text.
    Pretty,
}

/// Settings for [`crate::logging::init`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// One of `debug`, `info`, `warn`/`warning`, `error`.
    pub level: String,
    /// Log file; `None` logs to stderr.
    pub file_path: Option<PathBuf>,
    pub format: LogFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            level: "info".to_string(),
            file_path: None,
            format: LogFormat::Json,
        }
    }
}

impl Config {
    /// Parses configuration from TOML text. Missing sections and keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| GitError::Config(e.to_string()))
    }

    /// Loads configuration from `path`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| GitError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Config::from_toml_str(&content)
            .map_err(|e| GitError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Applies `GIT_SCRIBE_LOG_LEVEL` and `GIT_SCRIBE_LOG_FILE` when set and non-empty.
    pub fn apply_env_overrides(mut self) -> Config {
        if let Some(level) = non_empty_var(LOG_LEVEL_ENV) {
            self.logger.level = level;
        }
        if let Some(file) = non_empty_var(LOG_FILE_ENV) {
            self.logger.file_path = Some(PathBuf::from(file));
        }
        self
    }

    /// The settings a [`crate::Repository`] needs.
    pub fn repository(&self) -> RepositoryConfig {
        RepositoryConfig {
            executable: self.git.executable.clone(),
            max_untracked_size: self.git.max_untracked_size,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Construction-time settings of a [`crate::Repository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub executable: String,
    pub max_untracked_size: u64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Config::default().repository()
    }
}
