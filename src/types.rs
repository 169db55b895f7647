//! Defines core value types: status codes and change kinds.
//!
//! All knowledge of the single-character codes emitted by `git` lives here.
use super::GitError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::{
    fmt,
    fmt::{Display, Formatter},
    result::Result as stdResult,
};

/// A specialized `Result` type for repository operations.
pub type Result<A> = stdResult<A, GitError>;

/// State of one side (index or worktree) of a porcelain v1 `XY` status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryState {
    Unmodified,
    Modified,
    TypeChanged,
    Added,
    Deleted,
    Renamed,
    Copied,
    Unmerged,
    Untracked,
    Ignored,
    /// A character `git` emitted that this table does not know.
    Unknown(char),
}

// Mapping table between porcelain characters and states.
const ENTRY_STATE_CODES: [(char, EntryState); 10] = [
    (' ', EntryState::Unmodified),
    ('M', EntryState::Modified),
    ('T', EntryState::TypeChanged),
    ('A', EntryState::Added),
    ('D', EntryState::Deleted),
    ('R', EntryState::Renamed),
    ('C', EntryState::Copied),
    ('U', EntryState::Unmerged),
    ('?', EntryState::Untracked),
    ('!', EntryState::Ignored),
];

impl EntryState {
    /// Maps a porcelain status character to its state.
    pub fn from_code(code: char) -> EntryState {
        ENTRY_STATE_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, state)| *state)
            .unwrap_or(EntryState::Unknown(code))
    }

    /// The porcelain character for this state.
    pub fn code(self) -> char {
        match self {
            EntryState::Unknown(c) => c,
            state => ENTRY_STATE_CODES
                .iter()
                .find(|(_, s)| *s == state)
                .map(|(c, _)| *c)
                .unwrap_or(' '),
        }
    }
}

/// The two-character porcelain v1 status code of a path: index state then worktree state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusCode {
    index: char,
    worktree: char,
}

/// The code `git` uses for paths with no history.
pub const UNTRACKED_CODE: StatusCode = StatusCode {
    index: '?',
    worktree: '?',
};

impl StatusCode {
    pub fn new(index: char, worktree: char) -> StatusCode {
        StatusCode { index, worktree }
    }

    /// Raw index-side character.
    pub fn index_char(&self) -> char {
        self.index
    }

    /// Raw worktree-side character.
    pub fn worktree_char(&self) -> char {
        self.worktree
    }

    pub fn index(&self) -> EntryState {
        EntryState::from_code(self.index)
    }

    pub fn worktree(&self) -> EntryState {
        EntryState::from_code(self.worktree)
    }

    pub fn is_untracked(&self) -> bool {
        *self == UNTRACKED_CODE
    }

    /// Whether the index side records a change for the next commit.
    pub fn is_staged(&self) -> bool {
        self.index != ' ' && self.index != '?'
    }

    /// Whether the worktree side differs from the index.
    ///
    /// A worktree deletion (`" D"`) counts as modified.
    pub fn is_modified(&self) -> bool {
        self.worktree != ' ' && !self.is_untracked()
    }
}

impl FromStr for StatusCode {
    type Err = GitError;

    /// Parses exactly two characters, e.g. `"M "`, `" M"` or `"??"`.
    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(index), Some(worktree), None) => Ok(StatusCode { index, worktree }),
            _ => Err(GitError::InvalidStatusCode(s.to_string())),
        }
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.index, self.worktree)
    }
}

/// How a file changed within a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    /// No marker seen yet for this file.
    #[default]
    Unknown,
}

impl ChangeKind {
    /// Whether a diff marker has determined the kind.
    pub fn is_set(self) -> bool {
        self != ChangeKind::Unknown
    }
}

impl Display for ChangeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Copied => "copied",
            ChangeKind::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

// --- Tests ---
