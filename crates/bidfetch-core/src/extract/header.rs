//! Recognizing download-listing tables by their header row.

use crate::table::Row;

const SERIAL: &str = "sl. no";
const NAME: &str = "name";
const DOWNLOAD_LINK: &str = "download link";
const CLICK_HERE: &str = "click here";

/// Column positions of a download-listing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingColumns {
    pub name_idx: usize,
    pub link_idx: usize,
}

impl ListingColumns {
    /// Name column used when the header has no "Name" cell.
    pub const DEFAULT_NAME_IDX: usize = 1;

    /// Resolves the columns from a header row, or `None` if this is not a
    /// listing header. Matching is exact after lower-casing.
    pub fn resolve(header: &Row) -> Option<Self> {
        let lowered: Vec<String> = header
            .cells()
            .iter()
            .map(|c| c.as_deref().unwrap_or("").to_lowercase())
            .collect();
        let position = |label: &str| lowered.iter().position(|h| h == label);

        position(SERIAL)?;
        let link_idx = position(DOWNLOAD_LINK).or_else(|| position(CLICK_HERE))?;
        let name_idx = position(NAME).unwrap_or(Self::DEFAULT_NAME_IDX);
        Some(Self { name_idx, link_idx })
    }

    /// Rows shorter than this cannot hold both columns.
    pub fn min_row_len(&self) -> usize {
        self.name_idx.max(self.link_idx) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Row {
        cells.iter().map(|c| Some(*c)).collect()
    }

    #[test]
    fn click_here_listing() {
        let cols = ListingColumns::resolve(&header(&["Sl. No", "Name", "Click Here"])).unwrap();
        assert_eq!(cols, ListingColumns { name_idx: 1, link_idx: 2 });
        assert_eq!(cols.min_row_len(), 3);
    }

    #[test]
    fn download_link_preferred_over_click_here() {
        let cols = ListingColumns::resolve(&header(&[
            "SL. NO",
            "Click Here",
            "Document",
            "Name",
            "Download Link",
        ]))
        .unwrap();
        assert_eq!(cols, ListingColumns { name_idx: 3, link_idx: 4 });
    }

    #[test]
    fn missing_name_defaults_to_second_column() {
        let cols =
            ListingColumns::resolve(&header(&["Sl. No", "Document", "Download Link"])).unwrap();
        assert_eq!(cols.name_idx, 1);
        assert_eq!(cols.link_idx, 2);
    }

    #[test]
    fn fails_closed_without_sentinels() {
        assert_eq!(ListingColumns::resolve(&header(&["Sl. No", "Name", "Remarks"])), None);
        assert_eq!(ListingColumns::resolve(&header(&["No", "Name", "Click Here"])), None);
        assert_eq!(ListingColumns::resolve(&Row::default()), None);
    }

    #[test]
    fn blank_header_cells_never_match() {
        let row: Row = vec![None, Some("Sl. No"), None, Some("click here")]
            .into_iter()
            .collect();
        let cols = ListingColumns::resolve(&row).unwrap();
        assert_eq!(cols, ListingColumns { name_idx: 1, link_idx: 3 });
    }
}
