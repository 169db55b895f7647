//! Defines the error types used throughout the library.
use std::path::PathBuf;
use thiserror::Error;

/// Represents errors that can occur while querying or mutating a repository.
#[derive(Debug, Error)]
pub enum GitError {
    /// Failed to access the current working directory, e.g., due to permissions.
    #[error("Unable to access current working directory")]
    WorkingDirectoryInaccessible,

    /// The directory does not contain a `.git` directory or file.
    #[error("not a git repository: {0:?}")]
    NotARepository(PathBuf),

    /// Failed to spawn the external 'git' process.
    #[error("Unable to execute git process: {0}")]
    Execution(#[source] std::io::Error),

    /// The 'git' command ran but exited with a non-zero status.
    /// Contains the combined stdout and stderr of the failed command.
    #[error("git command failed (git {args}, exit code {status:?})\nOutput: {output}")]
    CommandFailed {
        args: String,
        status: Option<i32>,
        output: String,
    },

    /// The provided string is not a two-character porcelain status code.
    #[error("Status code is invalid: {0:?}")]
    InvalidStatusCode(String),

    /// A stage/unstage/discard operation was called without any paths.
    #[error("no files specified to {operation}")]
    NoPathsSpecified { operation: &'static str },

    /// A commit or amend was requested with an empty message.
    #[error("commit message cannot be empty")]
    EmptyCommitMessage,

    /// The operation requires at least one commit in history.
    #[error("no commits found in repository")]
    NoCommits,

    /// Filesystem failure outside of the git process (e.g., deleting an untracked file).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration, or logging already initialized.
    #[error("configuration error: {0}")]
    Config(String),

    /// The 'git' executable was not found in the system's PATH.
    #[error("'git' command not found. Please ensure Git is installed and that its executable is included in your system's PATH environment variable.")]
    GitNotFound,
}

impl GitError {
    /// Returns `true` for errors raised locally before any git process was started.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            GitError::NoPathsSpecified { .. } | GitError::EmptyCommitMessage | GitError::NoCommits
        )
    }
}
