//! Folder merge: every downloaded PDF in a directory → `0_{name}.pdf`.

mod accumulator;

pub use accumulator::MergeAccumulator;

use crate::observer::RunObserver;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix marking a previous merge output; such files are never merge inputs.
pub const MERGED_PREFIX: &str = "0_";

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("pdf: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("document has no pages")]
    NoPages,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged {
        path: PathBuf,
        appended: Vec<PathBuf>,
        skipped: Vec<PathBuf>,
    },
    /// No qualifying files in the folder.
    NothingToMerge,
    /// Every candidate failed to load; no output was written.
    NothingAppended { skipped: Vec<PathBuf> },
}

/// File name of the merged output for `merged_name`.
pub fn merged_file_name(merged_name: &str) -> String {
    format!("{}{}.pdf", MERGED_PREFIX, merged_name)
}

fn is_merge_input(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(".pdf") && !file_name.starts_with(MERGED_PREFIX)
}

/// Regular files directly in `dir` ending in `.pdf` (any case), excluding
/// previous merge outputs, sorted by name.
pub fn list_merge_inputs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if is_merge_input(&name.to_string_lossy()) {
            inputs.push(entry.path());
        }
    }
    inputs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(inputs)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Merges the PDFs of `dir` into `{dir}/0_{merged_name}.pdf`.
///
/// Files that fail to load are logged and left out. Listing the directory
/// or writing the output are the only errors.
pub fn merge_folder(
    dir: &Path,
    merged_name: &str,
    observer: &dyn RunObserver,
) -> Result<MergeOutcome, MergeError> {
    let inputs = list_merge_inputs(dir)?;
    if inputs.is_empty() {
        observer.log("No PDFs found to merge.".to_string());
        return Ok(MergeOutcome::NothingToMerge);
    }

    let mut merger = MergeAccumulator::new();
    let mut appended = Vec::new();
    let mut skipped = Vec::new();
    for path in inputs {
        match merger.append_file(&path) {
            Ok(pages) => {
                tracing::debug!(file = %path.display(), pages, "appended");
                appended.push(path);
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), "merge append failed: {}", e);
                observer.log(format!("Failed to merge: {}: {}", display_name(&path), e));
                skipped.push(path);
            }
        }
    }

    if appended.is_empty() {
        observer.log("No readable PDFs to merge; nothing written.".to_string());
        return Ok(MergeOutcome::NothingAppended { skipped });
    }

    let file_name = merged_file_name(merged_name);
    let out = dir.join(&file_name);
    merger.write(&out)?;
    observer.log(format!("Merged as: {}", file_name));
    Ok(MergeOutcome::Merged {
        path: out,
        appended,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_input_filter() {
        assert!(is_merge_input("a.pdf"));
        assert!(is_merge_input("B.PDF"));
        assert!(is_merge_input("x(1).Pdf"));
        assert!(!is_merge_input("0_old.pdf"));
        assert!(!is_merge_input("notes.txt"));
        assert!(!is_merge_input("pdf"));
        assert!(is_merge_input("00_not_reserved.pdf"));
        assert!(is_merge_input("10_fine.pdf"));
    }

    #[test]
    fn listing_is_sorted_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.pdf", "0_old.pdf", "c.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("d.pdf")).unwrap();
        let names: Vec<String> = list_merge_inputs(dir.path())
            .unwrap()
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn merged_name_uses_reserved_prefix() {
        assert_eq!(merged_file_name("notice"), "0_notice.pdf");
    }
}
