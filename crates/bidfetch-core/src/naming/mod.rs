//! Local filename derivation for downloaded items and output folders.
//!
//! Display names scraped from notice tables are free text; they are
//! sanitized into a single path segment and, when a same-named file is
//! already on disk, disambiguated with a `(n)` suffix.

mod collision;
mod sanitize;

pub use collision::resolve_collision;
pub use sanitize::sanitize_filename;

/// Label used when a name sanitizes to nothing.
pub const UNNAMED_FILE: &str = "unnamed_file";

/// Sanitizes `name`, substituting [`UNNAMED_FILE`] when nothing usable remains.
pub fn sanitize_or_unnamed(name: &str) -> String {
    let sanitized = sanitize_filename(name);
    if sanitized.is_empty() {
        UNNAMED_FILE.to_string()
    } else {
        sanitized
    }
}
