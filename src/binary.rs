//! Heuristic text/binary classification of file content.

/// Share of disallowed control bytes above which content counts as binary.
const CONTROL_BYTE_RATIO: f64 = 0.3;

/// Returns `true` when `content` looks binary.
///
/// Content containing a NUL byte is binary. Otherwise content is binary when
/// more than 30% of its bytes are control characters other than tab, LF and CR.
/// Empty content is text.
pub fn is_binary_content(content: &[u8]) -> bool {
    if content.is_empty() {
        return false;
    }
    if content.contains(&0) {
        return true;
    }

    let control = content.iter().filter(|&&b| is_disallowed_control(b)).count();
    control as f64 / content.len() as f64 > CONTROL_BYTE_RATIO
}

fn is_disallowed_control(b: u8) -> bool {
    b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r')
}
