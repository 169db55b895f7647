//! Diff synthesis for untracked files.
//!
//! Untracked files have no history, so `git diff` never reports them. These
//! records are built from the file content on disk instead, in the same shape
//! [`crate::diff::parse_diff`] produces for a newly added file.

use crate::binary::is_binary_content;
use crate::models::{DiffRecord, FileState};
use crate::types::ChangeKind;
use std::fmt::Write;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Files larger than this are reported as binary without being read.
pub const DEFAULT_MAX_UNTRACKED_SIZE: u64 = 1024 * 1024;

/// Builds [`DiffRecord`]s for untracked paths of one working directory.
#[derive(Debug, Clone)]
pub struct UntrackedDiffSynthesizer {
    work_dir: PathBuf,
    max_size: u64,
}

impl UntrackedDiffSynthesizer {
    pub fn new<P: AsRef<Path>>(work_dir: P) -> UntrackedDiffSynthesizer {
        UntrackedDiffSynthesizer {
            work_dir: PathBuf::from(work_dir.as_ref()),
            max_size: DEFAULT_MAX_UNTRACKED_SIZE,
        }
    }

    /// Overrides the size above which files become binary placeholders.
    pub fn with_max_size(mut self, max_size: u64) -> UntrackedDiffSynthesizer {
        self.max_size = max_size;
        self
    }

    /// Synthesizes records for the untracked entries of `status`.
    ///
    /// With an empty `paths`, every untracked entry is used in status order.
    /// Otherwise only requested paths that are untracked are used, in request
    /// order; other requested paths are dropped. Directories are skipped and a
    /// file that cannot be read is skipped without failing the batch.
    pub fn synthesize<S: AsRef<str>>(&self, status: &[FileState], paths: &[S]) -> Vec<DiffRecord> {
        let untracked: Vec<&str> = status
            .iter()
            .filter(|file| file.is_untracked())
            .map(|file| file.path.as_str())
            .collect();

        let targets: Vec<&str> = if paths.is_empty() {
            untracked
        } else {
            paths
                .iter()
                .map(|p| p.as_ref())
                .filter(|p| untracked.contains(p))
                .collect()
        };

        targets
            .into_iter()
            .filter_map(|path| match self.synthesize_file(path) {
                Ok(record) => record,
                Err(e) => {
                    warn!(path, error = %e, "Skipping unreadable untracked file");
                    None
                }
            })
            .collect()
    }

    /// Synthesizes the record for one path relative to the working directory.
    ///
    /// Returns `Ok(None)` for directories.
    pub fn synthesize_file(&self, path: &str) -> io::Result<Option<DiffRecord>> {
        let full_path = self.work_dir.join(path);
        let metadata = fs::metadata(&full_path)?;

        if metadata.is_dir() {
            debug!(path, "Skipping untracked directory");
            return Ok(None);
        }

        if metadata.len() > self.max_size {
            return Ok(Some(binary_record(
                path,
                format!("Binary file {} (size: {} bytes)", path, metadata.len()),
            )));
        }

        let content = fs::read(&full_path)?;
        if is_binary_content(&content) {
            return Ok(Some(binary_record(path, format!("Binary file {}", path))));
        }

        Ok(Some(text_record(path, &String::from_utf8_lossy(&content))))
    }
}

fn binary_record(path: &str, placeholder: String) -> DiffRecord {
    DiffRecord {
        file_path: path.to_string(),
        new_path: path.to_string(),
        change_kind: ChangeKind::Added,
        is_binary: true,
        content: placeholder,
        ..Default::default()
    }
}

fn text_record(path: &str, text: &str) -> DiffRecord {
    let lines = split_lines(text);

    let mut content = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(content, "diff --git a/{} b/{}", path, path);
    content.push_str("new file mode 100644\n");
    content.push_str("index 0000000..0000000\n");
    content.push_str("--- /dev/null\n");
    let _ = writeln!(content, "+++ b/{}", path);
    if lines.is_empty() {
        content.push_str("@@ -0,0 +0,0 @@\n");
    } else {
        let _ = writeln!(content, "@@ -0,0 +1,{} @@", lines.len());
    }
    for line in &lines {
        content.push('+');
        content.push_str(line);
        content.push('\n');
    }

    DiffRecord {
        file_path: path.to_string(),
        new_path: path.to_string(),
        change_kind: ChangeKind::Added,
        additions: lines.len(),
        is_binary: false,
        content,
        ..Default::default()
    }
}

/// Splits on `\n`. A final newline terminates the last line rather than
/// starting an empty one, and empty text has no lines.
fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.strip_suffix('\n').unwrap_or(text).split('\n').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DiffHunk;
    use crate::types::StatusCode;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn untracked(path: &str) -> FileState {
        FileState::new(path, StatusCode::from_str("??").unwrap())
    }

    fn write(dir: &TempDir, name: &str, content: &[u8]) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_three_line_text_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "test.txt", b"line 1\nline 2\nline 3");

        let record = UntrackedDiffSynthesizer::new(dir.path())
            .synthesize_file("test.txt")
            .unwrap()
            .unwrap();

        assert_eq!(record.file_path, "test.txt");
        assert_eq!(record.change_kind, ChangeKind::Added);
        assert!(!record.is_binary);
        assert_eq!(record.additions, 3);
        assert!(record.content.starts_with("diff --git a/test.txt b/test.txt\n"));
        assert!(record.content.contains("new file mode 100644"));
        assert!(record.content.contains("--- /dev/null\n+++ b/test.txt"));
        assert!(record.content.contains("@@ -0,0 +1,3 @@"));
        assert!(record.content.contains("+line 1\n+line 2\n+line 3\n"));

        let hunks = record.hunks();
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].new_lines, 3);
        assert_eq!(
            record.content.lines().filter(|l| l.starts_with('+') && !l.starts_with("+++")).count(),
            3
        );
    }

    #[test]
    fn test_trailing_newline_does_not_add_a_line() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.txt", b"one\ntwo\n");

        let record = UntrackedDiffSynthesizer::new(dir.path())
            .synthesize_file("a.txt")
            .unwrap()
            .unwrap();
        assert_eq!(record.additions, 2);
        assert_eq!(
            DiffHunk::from_header("@@ -0,0 +1,2 @@").unwrap(),
            record.hunks()[0]
        );
    }

    #[test]
    fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "empty.txt", b"");

        let record = UntrackedDiffSynthesizer::new(dir.path())
            .synthesize_file("empty.txt")
            .unwrap()
            .unwrap();
        assert!(!record.is_binary);
        assert_eq!(record.additions, 0);
        assert!(record.content.ends_with("@@ -0,0 +0,0 @@\n"));
    }

    #[test]
    fn test_binary_file_gets_placeholder() {
        let dir = TempDir::new().unwrap();
        write(&dir, "binary.dat", &[0x00, 0x01, 0x02, 0xFF, 0xFE]);

        let record = UntrackedDiffSynthesizer::new(dir.path())
            .synthesize_file("binary.dat")
            .unwrap()
            .unwrap();
        assert!(record.is_binary);
        assert_eq!(record.change_kind, ChangeKind::Added);
        assert_eq!(record.content, "Binary file binary.dat");
        assert_eq!(record.additions, 0);
        assert_eq!(record.deletions, 0);
    }

    #[test]
    fn test_large_file_is_not_read() {
        let dir = TempDir::new().unwrap();
        write(&dir, "big.txt", &[b'a'; 64]);

        let record = UntrackedDiffSynthesizer::new(dir.path())
            .with_max_size(16)
            .synthesize_file("big.txt")
            .unwrap()
            .unwrap();
        assert!(record.is_binary);
        assert_eq!(record.content, "Binary file big.txt (size: 64 bytes)");
    }

    #[test]
    fn test_directory_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let result = UntrackedDiffSynthesizer::new(dir.path())
            .synthesize_file("sub")
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_synthesize_filters_requested_paths() {
        let dir = TempDir::new().unwrap();
        for name in ["file1.txt", "file2.txt", "file3.txt"] {
            write(&dir, name, b"content");
        }
        let status = vec![
            untracked("file1.txt"),
            untracked("file2.txt"),
            untracked("file3.txt"),
            FileState::new("tracked.txt", StatusCode::from_str(" M").unwrap()),
        ];
        let synthesizer = UntrackedDiffSynthesizer::new(dir.path());

        let records = synthesizer.synthesize(&status, &["file1.txt", "file3.txt", "tracked.txt", "missing.txt"]);
        let mut paths: Vec<&str> = records.iter().map(|r| r.file_path.as_str()).collect();
        paths.sort();
        assert_eq!(paths, vec!["file1.txt", "file3.txt"]);

        let all = synthesizer.synthesize::<&str>(&status, &[]);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "present.txt", b"hi");
        // Reported as untracked but removed before synthesis.
        let status = vec![untracked("present.txt"), untracked("vanished.txt")];

        let records = UntrackedDiffSynthesizer::new(dir.path()).synthesize::<&str>(&status, &[]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_path, "present.txt");
    }
}
