//! Collision suffixes: `name.pdf`, `name(1).pdf`, `name(2).pdf`, ...

use std::path::{Path, PathBuf};

/// Returns the first path of the form `{dir}/{stem}.{ext}` or
/// `{dir}/{stem}({n}).{ext}` (n = 1, 2, ...) that does not exist yet.
///
/// The check is a plain existence probe; callers that must never overwrite
/// should still open the result with create-new semantics.
pub fn resolve_collision(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let first = dir.join(format!("{}.{}", stem, ext));
    if !first.exists() {
        return first;
    }
    let mut n = 1u32;
    loop {
        let candidate = dir.join(format!("{}({}).{}", stem, n, ext));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}
