//! Provides structured records describing repository state.

use crate::types::{ChangeKind, StatusCode};
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Matches `@@ -old_start[,old_lines] +new_start[,new_lines] @@`.
static HUNK_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@")
        .expect("Invalid static hunk header regex") // Expect here is okay for static regex
});

/// Represents one path reported by `git status --porcelain=v1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileState {
    /// Repository-relative path, exactly as reported (leading spaces kept).
    pub path: String,
    /// The raw two-character status code.
    pub code: StatusCode,
    /// The index side records a change.
    pub staged: bool,
    /// The worktree side differs from the index. Never set for untracked paths.
    pub modified: bool,
}

impl FileState {
    pub fn new(path: impl Into<String>, code: StatusCode) -> FileState {
        FileState {
            path: path.into(),
            code,
            staged: code.is_staged(),
            modified: code.is_modified(),
        }
    }

    pub fn is_untracked(&self) -> bool {
        self.code.is_untracked()
    }
}

/// Represents the diff of one file, either parsed from `git diff` or synthesized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// The path the change applies to: the new path, or the old path for deletions.
    pub file_path: String,
    pub old_path: String,
    pub new_path: String,
    pub change_kind: ChangeKind,
    /// Count of `+` content lines.
    pub additions: usize,
    /// Count of `-` content lines.
    pub deletions: usize,
    pub is_binary: bool,
    /// The full diff block for this file, or a placeholder for binary content.
    pub content: String,
}

impl DiffRecord {
    /// Parses every hunk header found in `content`.
    ///
    /// Headers that do not match the unified format are skipped.
    pub fn hunks(&self) -> Vec<DiffHunk> {
        self.content
            .lines()
            .filter(|line| line.starts_with("@@"))
            .filter_map(DiffHunk::from_header)
            .collect()
    }

    /// One-line summary such as `src/lib.rs (modified, +3 -1)`.
    pub fn summary(&self) -> String {
        if self.is_binary {
            format!("{} ({}, binary)", self.file_path, self.change_kind)
        } else {
            format!(
                "{} ({}, +{} -{})",
                self.file_path, self.change_kind, self.additions, self.deletions
            )
        }
    }
}

/// Line ranges declared by a hunk header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_lines: usize,
    pub new_start: usize,
    pub new_lines: usize,
    /// The header line as it appeared in the diff.
    pub header: String,
}

impl DiffHunk {
    /// Parses a `@@ -a,b +c,d @@` line. An omitted count means one line.
    pub fn from_header(line: &str) -> Option<DiffHunk> {
        let caps = HUNK_HEADER_REGEX.captures(line)?;
        let number = |i: usize, default: usize| -> Option<usize> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(default),
            }
        };

        Some(DiffHunk {
            old_start: number(1, 0)?,
            old_lines: number(2, 1)?,
            new_start: number(3, 0)?,
            new_lines: number(4, 1)?,
            header: line.to_string(),
        })
    }
}

/// Represents one commit from `git log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    /// The first eight characters of the hash.
    pub short_hash: String,
    pub author: String,
    /// Author date; `None` when the date text could not be parsed.
    pub date: Option<DateTime<FixedOffset>>,
    pub subject: String,
    pub body: String,
}

/// Terminates each commit in `git log` output (`%x1e`, ASCII record separator).
pub const LOG_RECORD_SEPARATOR: char = '\x1e';

impl CommitRecord {
    /// Splits `git log` output into commits. Leading newlines between records are ignored.
    pub fn parse_log(output: &str) -> Vec<CommitRecord> {
        output
            .split(LOG_RECORD_SEPARATOR)
            .map(|record| record.trim_start_matches('\n'))
            .filter(|record| !record.is_empty())
            .filter_map(CommitRecord::from_log_record)
            .collect()
    }

    /// Parses one `%H|%an|%ad|%s|%b` record (with `--date=iso`).
    ///
    /// The body is the last field and may span lines or contain `|`; records
    /// are delimited by [`LOG_RECORD_SEPARATOR`], never by newlines. Returns
    /// `None` for records with fewer than four fields.
    pub(crate) fn from_log_record(record: &str) -> Option<CommitRecord> {
        let parts: Vec<&str> = record.splitn(5, '|').collect();
        if parts.len() < 4 {
            return None;
        }

        let hash = parts[0].to_string();
        let short_hash = hash.get(..8).unwrap_or(&hash).to_string();
        let date = DateTime::parse_from_str(parts[2], "%Y-%m-%d %H:%M:%S %z").ok();

        Some(CommitRecord {
            short_hash,
            hash,
            author: parts[1].to_string(),
            date,
            subject: parts[3].to_string(),
            body: parts.get(4).map(|b| b.trim_end().to_string()).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::str::FromStr;

    #[test]
    fn test_file_state_derives_flags() {
        let staged = FileState::new("file.txt", StatusCode::from_str("M ").unwrap());
        assert!(staged.staged);
        assert!(!staged.modified);

        let untracked = FileState::new("new.txt", StatusCode::from_str("??").unwrap());
        assert!(untracked.is_untracked());
        assert!(!untracked.staged);
        assert!(!untracked.modified);
    }

    #[test]
    fn test_hunk_header_parsing() {
        let hunk = DiffHunk::from_header("@@ -1,4 +1,6 @@ fn main() {").unwrap();
        assert_eq!((hunk.old_start, hunk.old_lines), (1, 4));
        assert_eq!((hunk.new_start, hunk.new_lines), (1, 6));

        let hunk = DiffHunk::from_header("@@ -3 +3 @@").unwrap();
        assert_eq!(hunk.old_lines, 1);
        assert_eq!(hunk.new_lines, 1);

        let hunk = DiffHunk::from_header("@@ -0,0 +1,3 @@").unwrap();
        assert_eq!(hunk.old_lines, 0);
        assert_eq!(hunk.new_lines, 3);

        assert!(DiffHunk::from_header("@@ garbage @@").is_none());
        assert!(DiffHunk::from_header("@@@ -1,2 -1,2 +1,3 @@@").is_none());
    }

    #[test]
    fn test_record_hunks_and_summary() {
        let record = DiffRecord {
            file_path: "src/lib.rs".into(),
            change_kind: ChangeKind::Modified,
            additions: 3,
            deletions: 1,
            content: "diff --git a/src/lib.rs b/src/lib.rs\n@@ -1,2 +1,4 @@\n a\n@@ -10,3 +12,3 @@\n b"
                .into(),
            ..Default::default()
        };
        let hunks = record.hunks();
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[1].new_start, 12);
        assert_eq!(record.summary(), "src/lib.rs (modified, +3 -1)");

        let binary = DiffRecord {
            file_path: "logo.png".into(),
            change_kind: ChangeKind::Added,
            is_binary: true,
            ..Default::default()
        };
        assert_eq!(binary.summary(), "logo.png (added, binary)");
    }

    #[test]
    fn test_commit_from_log_record() {
        let line = "0123456789abcdef0123456789abcdef01234567|Test User|2024-03-05 14:07:09 +0100|feat: add parser|Longer body";
        let commit = CommitRecord::from_log_record(line).unwrap();
        assert_eq!(commit.short_hash, "01234567");
        assert_eq!(commit.author, "Test User");
        assert_eq!(commit.subject, "feat: add parser");
        assert_eq!(commit.body, "Longer body");
        let date = commit.date.unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 5));
        assert_eq!(date.hour(), 14);
        assert_eq!(date.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_commit_from_log_record_edge_cases() {
        assert!(CommitRecord::from_log_record("only|three|fields").is_none());

        let commit = CommitRecord::from_log_record("abc|Me|not a date|subject").unwrap();
        assert_eq!(commit.short_hash, "abc");
        assert!(commit.date.is_none());
        assert!(commit.body.is_empty());

        // Bars inside the body are kept.
        let commit = CommitRecord::from_log_record("abc|Me|x|s|a|b").unwrap();
        assert_eq!(commit.body, "a|b");
    }

    #[test]
    fn test_parse_log_keeps_multiline_bodies_whole() {
        let output = "aaa|Me|2024-03-05 14:07:09 +0100|add table|Columns:\n\n| a | b | c |\n|---|---|---|\n\x1e\n\
                      bbb|Me|2024-03-04 10:00:00 +0000|first|\x1e";
        let commits = CommitRecord::parse_log(output);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].subject, "add table");
        assert_eq!(commits[0].body, "Columns:\n\n| a | b | c |\n|---|---|---|");
        assert_eq!(commits[1].hash, "bbb");
        assert!(commits[1].body.is_empty());

        assert!(CommitRecord::parse_log("").is_empty());
    }
}
