//! Parsing of unified diff output from `git diff`.

use crate::models::DiffRecord;
use crate::types::ChangeKind;

const FILE_MARKER: &str = "diff --git";
const NEW_FILE_MARKER: &str = "new file mode";
const DELETED_FILE_MARKER: &str = "deleted file mode";
const RENAME_MARKER: &str = "rename from";
const COPY_MARKER: &str = "copy from";
const BINARY_MARKER: &str = "Binary files";
const HUNK_MARKER: &str = "@@";

/// Parses `git diff` output into one [`DiffRecord`] per file section.
///
/// Each record's `content` holds every line of its section joined by `\n`,
/// starting with the `diff --git` line. Lines preceding the first section are
/// folded into the first record so that no input line is lost. Empty input
/// yields no records.
pub fn parse_diff(output: &str) -> Vec<DiffRecord> {
    let mut records = Vec::new();
    let mut current: Option<DiffRecord> = None;
    let mut content_lines: Vec<&str> = Vec::new();

    for line in output.lines() {
        if line.starts_with(FILE_MARKER) {
            if let Some(mut record) = current.take() {
                record.content = content_lines.join("\n");
                records.push(record);
                content_lines.clear();
            }
            current = Some(start_record(line));
        } else if let Some(record) = current.as_mut() {
            apply_line(record, line);
        }

        content_lines.push(line);
    }

    if let Some(mut record) = current {
        record.content = content_lines.join("\n");
        records.push(record);
    }

    records
}

/// Builds a record from a `diff --git a/OLD b/NEW` header.
///
/// Headers with fewer than four tokens leave every path empty.
fn start_record(header: &str) -> DiffRecord {
    let mut record = DiffRecord::default();
    let parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() >= 4 {
        record.old_path = strip_prefix(parts[2], "a/").to_string();
        record.new_path = strip_prefix(parts[3], "b/").to_string();
        record.file_path = record.new_path.clone();
    }
    record
}

fn strip_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    path.strip_prefix(prefix).unwrap_or(path)
}

fn apply_line(record: &mut DiffRecord, line: &str) {
    if line.starts_with(NEW_FILE_MARKER) {
        record.change_kind = ChangeKind::Added;
    } else if line.starts_with(DELETED_FILE_MARKER) {
        record.change_kind = ChangeKind::Deleted;
        record.file_path = record.old_path.clone();
    } else if line.starts_with(RENAME_MARKER) {
        record.change_kind = ChangeKind::Renamed;
    } else if line.starts_with(COPY_MARKER) {
        record.change_kind = ChangeKind::Copied;
    } else if line.starts_with(BINARY_MARKER) {
        record.is_binary = true;
    } else if line.starts_with(HUNK_MARKER) {
        // Markers seen earlier in the header win over the hunk.
        if !record.change_kind.is_set() {
            record.change_kind = ChangeKind::Modified;
        }
    } else if line.starts_with('+') && !line.starts_with("+++") {
        record.additions += 1;
    } else if line.starts_with('-') && !line.starts_with("---") {
        record.deletions += 1;
    }
}
