//! Sequential batch downloader.
//!
//! Fetches each [`DownloadItem`] in order over one persistent session,
//! writes it under a collision-free name, and reports a log line plus one
//! progress tick per item. One item's failure never stops the batch.

mod error;
mod pacing;
mod session;

pub use error::FetchError;
pub use pacing::Pacing;
pub use session::{HttpSession, SessionOptions};

use crate::config::FetchConfig;
use crate::extract::DownloadItem;
use crate::naming::{resolve_collision, sanitize_or_unnamed};
use crate::observer::RunObserver;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a batch needs besides its items and target.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub session: SessionOptions,
    pub pacing: Pacing,
}

impl From<&FetchConfig> for BatchOptions {
    fn from(cfg: &FetchConfig) -> Self {
        Self {
            session: SessionOptions::from(cfg),
            pacing: Pacing::new(cfg.pace()),
        }
    }
}

/// What happened to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { path: PathBuf, size_bytes: u64 },
    SkippedNonPdf { content_type: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub item: DownloadItem,
    pub outcome: Outcome,
}

/// Per-outcome counts of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn of(results: &[DownloadResult]) -> Self {
        results.iter().fold(Self::default(), |mut s, r| {
            match r.outcome {
                Outcome::Success { .. } => s.downloaded += 1,
                Outcome::SkippedNonPdf { .. } => s.skipped += 1,
                Outcome::Failed { .. } => s.failed += 1,
            }
            s
        })
    }
}

/// Downloads `items` into `target_dir` (created if missing), one at a time.
///
/// Returns one result per item in input order. Only failing to create the
/// directory or the HTTP session is an error for the whole batch.
pub fn download_batch(
    items: &[DownloadItem],
    target_dir: &Path,
    opts: &BatchOptions,
    observer: &dyn RunObserver,
) -> Result<Vec<DownloadResult>, FetchError> {
    fs::create_dir_all(target_dir)?;
    let mut session = HttpSession::new(&opts.session)?;

    let total = items.len();
    let mut results = Vec::with_capacity(total);
    for (idx, item) in items.iter().enumerate() {
        let current = idx + 1;
        let outcome = download_one(&mut session, item, target_dir, current, total, observer);
        results.push(DownloadResult {
            item: item.clone(),
            outcome,
        });
        observer.progress(current, total);
        opts.pacing.wait_after(current, total);
    }
    Ok(results)
}

fn download_one(
    session: &mut HttpSession,
    item: &DownloadItem,
    target_dir: &Path,
    current: usize,
    total: usize,
    observer: &dyn RunObserver,
) -> Outcome {
    let stem = sanitize_or_unnamed(&item.display_name);
    let dest = resolve_collision(target_dir, &stem, "pdf");
    observer.log(format!("Downloading {}/{}: {}", current, total, stem));
    tracing::debug!(url = %item.url, dest = %dest.display(), "GET");

    match session.fetch_pdf(&item.url, &dest) {
        Ok(size_bytes) => {
            let file_name = dest
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| stem.clone());
            observer.log(format!(
                "{}/{} Downloaded: {} ({} KB)",
                current,
                total,
                file_name,
                size_bytes / 1024
            ));
            Outcome::Success {
                path: dest,
                size_bytes,
            }
        }
        Err(FetchError::NotPdf(content_type)) => {
            tracing::info!(url = %item.url, %content_type, "skipped non-PDF response");
            observer.log(format!(
                "Skipping {}: Content-Type is not PDF but {}",
                item.display_name, content_type
            ));
            Outcome::SkippedNonPdf { content_type }
        }
        Err(e) => {
            tracing::warn!(url = %item.url, "download failed: {}", e);
            observer.log(format!(
                "{}/{} Failed: {}: {}",
                current, total, item.display_name, e
            ));
            Outcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}
