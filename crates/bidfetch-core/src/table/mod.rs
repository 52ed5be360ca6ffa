//! Tables found on PDF pages, as rows of optional cell text.
//!
//! [`TableSource`] is the seam between link extraction and PDF parsing:
//! [`PdfTables`] reconstructs ruled tables from a real document, tests feed
//! tables directly.

mod grid;
mod pdf;

pub use grid::{find_tables, Edge, GridSettings, TextFragment};
pub use pdf::PdfTables;

use thiserror::Error;

/// Error while reading tables from a document.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("pdf: {0}")]
    Pdf(#[from] pdf_oxide::Error),
    #[error("page {page} out of range ({count} pages)")]
    PageOutOfRange { page: usize, count: usize },
}

/// One table row. Cells are positional; a blank cell is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Option<String>>,
}

impl Row {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Number of cell positions, blank ones included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Text of cell `idx`; `None` when blank or past the end of the row.
    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).and_then(|c| c.as_deref())
    }

    pub fn cells(&self) -> &[Option<String>] {
        &self.cells
    }
}

impl<S: Into<String>> FromIterator<Option<S>> for Row {
    fn from_iter<I: IntoIterator<Item = Option<S>>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|c| c.map(Into::into)).collect())
    }
}

/// A table in reading order: row 0 first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Builds a table where every cell is present. Handy for literals.
    pub fn from_strings<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(|c| Some::<String>(c.into())).collect())
                .collect(),
        )
    }
}

/// Page-by-page access to the tables of a document.
pub trait TableSource {
    fn page_count(&mut self) -> Result<usize, TableError>;

    /// Tables on page `page` (0-based), ordered top to bottom.
    fn tables_on_page(&mut self, page: usize) -> Result<Vec<Table>, TableError>;
}

/// In-memory source: one `Vec<Table>` per page.
impl TableSource for Vec<Vec<Table>> {
    fn page_count(&mut self) -> Result<usize, TableError> {
        Ok(self.len())
    }

    fn tables_on_page(&mut self, page: usize) -> Result<Vec<Table>, TableError> {
        self.get(page)
            .cloned()
            .ok_or(TableError::PageOutOfRange {
                page,
                count: self.len(),
            })
    }
}
