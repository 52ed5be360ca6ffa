//! [`TableSource`] over a PDF file, backed by `pdf_oxide` for text spans and
//! vector paths.

use super::grid::{find_tables, Edge, GridSettings, TextFragment};
use super::{Table, TableError, TableSource};
use pdf_oxide::elements::{PathContent, PathOperation};
use pdf_oxide::layout::TextSpan;
use pdf_oxide::PdfDocument;
use std::path::Path;

/// Segments within this many points of axis-aligned count as rules.
const AXIS_TOLERANCE: f32 = 1.0;

pub struct PdfTables {
    doc: PdfDocument,
    settings: GridSettings,
}

impl PdfTables {
    pub fn open(path: &Path) -> Result<Self, TableError> {
        Ok(Self {
            doc: PdfDocument::open(path)?,
            settings: GridSettings::default(),
        })
    }
}

impl std::fmt::Debug for PdfTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfTables")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl TableSource for PdfTables {
    fn page_count(&mut self) -> Result<usize, TableError> {
        Ok(self.doc.page_count()?)
    }

    fn tables_on_page(&mut self, page: usize) -> Result<Vec<Table>, TableError> {
        let paths = self.doc.extract_paths(page)?;
        let edges: Vec<Edge> = paths.iter().flat_map(edges_from_path).collect();
        if edges.is_empty() {
            return Ok(Vec::new());
        }
        let fragments: Vec<TextFragment> = self
            .doc
            .extract_spans(page)?
            .iter()
            .filter_map(fragment_from_span)
            .collect();
        tracing::trace!(
            page,
            edges = edges.len(),
            fragments = fragments.len(),
            "page geometry"
        );
        Ok(find_tables(&edges, &fragments, &self.settings))
    }
}

fn fragment_from_span(span: &TextSpan) -> Option<TextFragment> {
    if span.text.trim().is_empty() {
        return None;
    }
    let b = &span.bbox;
    Some(TextFragment::new(
        span.text.clone(),
        b.left(),
        b.top(),
        b.right(),
        b.bottom(),
    ))
}

/// Rules drawn by one path. Rectangles count whether stroked or filled;
/// line segments only when stroked.
fn edges_from_path(path: &PathContent) -> Vec<Edge> {
    let stroked = path.has_stroke();
    let mut edges = Vec::new();
    let mut start: Option<(f32, f32)> = None;
    let mut current: Option<(f32, f32)> = None;

    for op in &path.operations {
        match *op {
            PathOperation::MoveTo(x, y) => {
                start = Some((x, y));
                current = Some((x, y));
            }
            PathOperation::LineTo(x, y) => {
                if let (true, Some((cx, cy))) = (stroked, current) {
                    edges.extend(Edge::from_segment(cx, cy, x, y, AXIS_TOLERANCE));
                }
                current = Some((x, y));
            }
            PathOperation::CurveTo(_, _, _, _, x, y) => {
                current = Some((x, y));
            }
            PathOperation::Rectangle(x, y, w, h) => {
                edges.extend(Edge::from_rect(x, y, w, h, AXIS_TOLERANCE));
                start = Some((x, y));
                current = Some((x, y));
            }
            PathOperation::ClosePath => {
                if let (true, Some((cx, cy)), Some((sx, sy))) = (stroked, current, start) {
                    edges.extend(Edge::from_segment(cx, cy, sx, sy, AXIS_TOLERANCE));
                }
                current = start;
            }
        }
    }
    edges
}
