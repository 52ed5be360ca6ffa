//! `bidfetch merge` – merge one folder without downloading anything.

use anyhow::{Context, Result};
use bidfetch_core::merge::{merge_folder, MergeOutcome};
use bidfetch_core::naming::sanitize_or_unnamed;
use std::path::Path;

use super::StdoutObserver;

pub fn run_merge(dir: &Path, name: Option<&str>) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }
    let name = match name {
        Some(n) => sanitize_or_unnamed(n),
        None => default_name(dir)?,
    };
    let outcome = merge_folder(dir, &name, &StdoutObserver)
        .with_context(|| format!("merge {}", dir.display()))?;
    if let MergeOutcome::Merged { appended, skipped, .. } = &outcome {
        tracing::info!(
            dir = %dir.display(),
            appended = appended.len(),
            skipped = skipped.len(),
            "merge finished"
        );
    }
    Ok(())
}

fn default_name(dir: &Path) -> Result<String> {
    let canonical = dir
        .canonicalize()
        .with_context(|| format!("resolve {}", dir.display()))?;
    let stem = canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(sanitize_or_unnamed(&stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_follows_the_folder() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Notice 12");
        std::fs::create_dir(&dir).unwrap();
        assert_eq!(default_name(&dir).unwrap(), "Notice 12");
    }

    #[test]
    fn merge_rejects_missing_folder() {
        let root = tempfile::tempdir().unwrap();
        assert!(run_merge(&root.path().join("nope"), None).is_err());
    }
}
