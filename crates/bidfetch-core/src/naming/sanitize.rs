//! Cross-platform filename sanitization.

/// Characters rejected by at least one of the desktop filesystems users save to.
const UNSAFE: &[char] = &['\\', '/', ':', '"', '*', '?', '<', '>', '|'];

/// Sanitizes free text for use as a single path segment.
///
/// - Trims surrounding whitespace
/// - Replaces each run of `\ / : " * ? < > |` with one `_`
/// - Replaces line breaks with spaces
///
/// The result is empty when the input is blank; see
/// [`super::sanitize_or_unnamed`] for the fallback.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_unsafe_run = false;

    for c in name.trim().chars() {
        if UNSAFE.contains(&c) {
            if !in_unsafe_run {
                out.push('_');
            }
            in_unsafe_run = true;
            continue;
        }
        in_unsafe_run = false;
        if c == '\n' || c == '\r' {
            out.push(' ');
        } else {
            out.push(c);
        }
    }

    out.trim().to_string()
}
