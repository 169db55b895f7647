//! Parsing of `git status --porcelain=v1` output.

use crate::models::FileState;
use crate::types::StatusCode;

/// Parses porcelain v1 status output into one [`FileState`] per entry.
///
/// The first two characters of each line are the status code and the path
/// starts at offset 3. Lines too short to hold a code and a path are skipped.
/// Renames are reported as `ORIG -> NEW` by git and kept verbatim in `path`.
pub fn parse_status(output: &str) -> Vec<FileState> {
    output.lines().filter_map(parse_status_line).collect()
}

fn parse_status_line(line: &str) -> Option<FileState> {
    if line.len() < 3 {
        return None;
    }
    let mut chars = line.chars();
    let code = StatusCode::new(chars.next()?, chars.next()?);
    // Offset 3 only lands on a char boundary when the code is ASCII.
    let path = line.get(3..)?;
    Some(FileState::new(path, code))
}
