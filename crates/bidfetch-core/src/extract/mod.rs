//! Link extraction: download listings in notice tables → [`DownloadItem`]s.

mod header;

pub use header::ListingColumns;

use crate::naming::{sanitize_or_unnamed, UNNAMED_FILE};
use crate::table::{PdfTables, Table, TableError, TableSource};
use std::path::Path;
use thiserror::Error;

/// A file to fetch: where from, and what to call it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    /// Sanitized, non-empty display name (no extension).
    pub display_name: String,
    /// Absolute URL; always starts with `http`.
    pub url: String,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot read tables from {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: TableError,
    },
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Opens `path` as a PDF and extracts its download items.
pub fn extract_from_pdf(path: &Path) -> Result<Vec<DownloadItem>, ExtractError> {
    let mut source = PdfTables::open(path).map_err(|source| ExtractError::Open {
        path: path.display().to_string(),
        source,
    })?;
    extract_download_items(&mut source)
}

/// Extracts items from every page, in page order then row order.
///
/// A page whose tables cannot be read is skipped with a warning; only a
/// failure to count pages aborts.
pub fn extract_download_items<S: TableSource + ?Sized>(
    source: &mut S,
) -> Result<Vec<DownloadItem>, ExtractError> {
    let pages = source.page_count()?;
    let mut items = Vec::new();
    for page in 0..pages {
        let tables = match source.tables_on_page(page) {
            Ok(tables) => tables,
            Err(e) => {
                tracing::warn!(page = page + 1, "skipping page: {}", e);
                continue;
            }
        };
        for table in &tables {
            items.extend(items_from_table(table));
        }
    }
    tracing::debug!(pages, items = items.len(), "extraction finished");
    Ok(items)
}

/// Items listed in one table; empty unless it is a download listing.
pub fn items_from_table(table: &Table) -> Vec<DownloadItem> {
    let Some((header, rows)) = table.rows.split_first() else {
        return Vec::new();
    };
    if rows.is_empty() {
        return Vec::new();
    }
    let Some(cols) = ListingColumns::resolve(header) else {
        return Vec::new();
    };

    rows.iter()
        .filter(|row| row.len() >= cols.min_row_len())
        .filter_map(|row| {
            let name = row
                .cell(cols.name_idx)
                .filter(|n| !n.is_empty())
                .unwrap_or(UNNAMED_FILE);
            let url = clean_link(row.cell(cols.link_idx).unwrap_or(""));
            url.starts_with("http").then(|| DownloadItem {
                display_name: sanitize_or_unnamed(name),
                url,
            })
        })
        .collect()
}

/// Links wrap across cell lines in notices; rejoin them.
fn clean_link(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}
