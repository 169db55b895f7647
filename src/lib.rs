//! The repository change-state model behind a terminal commit assistant.
//!
//! This library turns the text output of the `git` command-line tool into
//! typed records describing what changed in a working tree: per-path status,
//! per-file diffs, commit history. Untracked files, which `git diff` never
//! reports, get synthesized new-file diffs built from their content on disk.
//!
//! The `git` executable must be installed and accessible in the system's PATH
//! (or configured through [`RepositoryConfig`]).
//!
//! # Examples
//!
//! ```no_run
//! use git_scribe::{Repository, RepositoryConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Repository::open(".", RepositoryConfig::default())?;
//!
//! for file in repo.status()? {
//!     println!("{} {}", file.code, file.path);
//! }
//!
//! // Everything a commit message should describe.
//! let mut changes = repo.diff::<&str>(true, &[])?;
//! changes.extend(repo.untracked_diff::<&str>(&[])?);
//! for change in &changes {
//!     println!("{}", change.summary());
//! }
//!
//! repo.stage_all()?;
//! repo.commit("Describe the change")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Feature Flags
//!
//! - `async`: Enables [`AsyncRepository`] using Tokio.

pub mod binary;
pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod status;
pub mod types;
pub mod untracked;

// Feature-gated modules
#[cfg(feature = "async")]
pub mod async_git;

// Re-export key types
pub use crate::config::{Config, RepositoryConfig};
pub use crate::error::GitError;
pub use crate::models::{CommitRecord, DiffHunk, DiffRecord, FileState};
pub use crate::repository::{is_git_repository, Repository};
pub use crate::types::{ChangeKind, EntryState, Result, StatusCode};

#[cfg(feature = "async")]
pub use crate::async_git::AsyncRepository;

pub mod prelude {
    //! Convenient import for common types.
    pub use crate::binary::is_binary_content;
    pub use crate::config::{Config, RepositoryConfig};
    pub use crate::diff::parse_diff;
    pub use crate::error::GitError;
    pub use crate::models::*;
    pub use crate::repository::Repository;
    pub use crate::status::parse_status;
    pub use crate::types::{ChangeKind, EntryState, Result, StatusCode};
    pub use crate::untracked::UntrackedDiffSynthesizer;

    #[cfg(feature = "async")]
    pub use crate::async_git::AsyncRepository;
}
