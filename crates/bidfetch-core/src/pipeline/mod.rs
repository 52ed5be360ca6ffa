//! Orchestration: for each source notice, extract → download → merge.
//!
//! Sources are processed strictly one after another; nothing here is fatal
//! to the run. Every recovered problem is reported through the observer.

mod input;

pub use input::parse_source_list;

use crate::config::FetchConfig;
use crate::downloader::{download_batch, BatchOptions, BatchSummary, DownloadResult};
use crate::extract::{extract_from_pdf, DownloadItem, ExtractError};
use crate::merge::{merge_folder, MergeOutcome};
use crate::naming::sanitize_or_unnamed;
use crate::observer::RunObserver;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub batch: BatchOptions,
}

impl From<&FetchConfig> for PipelineOptions {
    fn from(cfg: &FetchConfig) -> Self {
        Self {
            batch: BatchOptions::from(cfg),
        }
    }
}

/// Per-source working set; its files outlive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub source_document: PathBuf,
    pub output_folder: PathBuf,
    pub items: Vec<DownloadItem>,
    pub results: Vec<DownloadResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    NotFound,
    Unreadable(String),
    NoLinks,
    Processed {
        context: RunContext,
        /// `None` when the download or merge step could not run.
        merge: Option<MergeOutcome>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: PathBuf,
    pub status: SourceStatus,
}

/// Output folder for `source`: a sibling named after its sanitized stem.
pub fn output_folder_for(source: &Path) -> (PathBuf, String) {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = sanitize_or_unnamed(&stem);
    let parent = source.parent().unwrap_or_else(|| Path::new(""));
    (parent.join(&name), name)
}

/// Runs the whole pipeline over `sources` using PDF table extraction.
pub fn run_sources(
    sources: &[PathBuf],
    opts: &PipelineOptions,
    observer: &dyn RunObserver,
) -> Vec<SourceReport> {
    run_sources_with(sources, opts, observer, extract_from_pdf)
}

/// Like [`run_sources`] with a custom extractor.
pub fn run_sources_with<F>(
    sources: &[PathBuf],
    opts: &PipelineOptions,
    observer: &dyn RunObserver,
    mut extract: F,
) -> Vec<SourceReport>
where
    F: FnMut(&Path) -> Result<Vec<DownloadItem>, ExtractError>,
{
    let mut reports = Vec::with_capacity(sources.len());
    for source in sources {
        let status = process_source(source, opts, observer, &mut extract);
        reports.push(SourceReport {
            source: source.clone(),
            status,
        });
    }
    observer.log("All downloads and merges completed.".to_string());
    observer.finish();
    reports
}

fn process_source<F>(
    source: &Path,
    opts: &PipelineOptions,
    observer: &dyn RunObserver,
    extract: &mut F,
) -> SourceStatus
where
    F: FnMut(&Path) -> Result<Vec<DownloadItem>, ExtractError>,
{
    if !source.is_file() {
        observer.log(format!("File not found: {}", source.display()));
        return SourceStatus::NotFound;
    }

    observer.log(format!("Processing: {}", source.display()));
    let items = match extract(source) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(source = %source.display(), "extraction failed: {}", e);
            observer.log(format!("Could not read {}: {}", source.display(), e));
            return SourceStatus::Unreadable(e.to_string());
        }
    };
    observer.log(format!("Files to download: {}", items.len()));
    if items.is_empty() {
        observer.log("No valid download links. Skipping.".to_string());
        return SourceStatus::NoLinks;
    }

    let (folder, name) = output_folder_for(source);
    observer.log(format!("Saving to: {}", folder.display()));

    let batch = download_batch(&items, &folder, &opts.batch, observer);
    observer.reset_progress();
    let results = match batch {
        Ok(results) => {
            let s = BatchSummary::of(&results);
            tracing::info!(
                source = %source.display(),
                downloaded = s.downloaded,
                skipped = s.skipped,
                failed = s.failed,
                "batch finished"
            );
            results
        }
        Err(e) => {
            tracing::warn!(folder = %folder.display(), "batch could not start: {}", e);
            observer.log(format!(
                "Could not start downloads into {}: {}",
                folder.display(),
                e
            ));
            Vec::new()
        }
    };

    let merge = if folder.is_dir() {
        match merge_folder(&folder, &name, observer) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(folder = %folder.display(), "merge failed: {}", e);
                observer.log(format!("Merge failed in {}: {}", folder.display(), e));
                None
            }
        }
    } else {
        None
    };

    SourceStatus::Processed {
        context: RunContext {
            source_document: source.to_path_buf(),
            output_folder: folder,
            items,
            results,
        },
        merge,
    }
}
