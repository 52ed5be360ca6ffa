//! Small PDFs built with lopdf.
//!
//! Merge fixtures are told apart by page width. Notice fixtures draw ruled
//! tables with Helvetica text so they go through real table extraction.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

const PAGE_HEIGHT: i64 = 792;
const NOTICE_WIDTH: i64 = 612;
const FONT_SIZE: i64 = 10;
const LINE_GAP: i64 = 12;

/// Serializes a document with one page per content, all sharing one font.
/// The MediaBox lives on the page tree node, so pages inherit it.
fn build_document(pages: Vec<Content>, width: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for content in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

fn text_ops(ops: &mut Vec<Operation>, text: &str, x: i64, y: i64) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    ops.push(Operation::new("ET", vec![]));
}

/// A document with `pages` pages of width `width`.
pub fn pdf_bytes(width: i64, pages: usize) -> Vec<u8> {
    let contents = (0..pages)
        .map(|n| {
            let mut operations = Vec::new();
            text_ops(&mut operations, &format!("w{} p{}", width, n + 1), 20, 40);
            Content { operations }
        })
        .collect();
    build_document(contents, width)
}

pub fn write_pdf(path: &Path, width: i64, pages: usize) {
    std::fs::write(path, pdf_bytes(width, pages)).unwrap();
}

/// MediaBox width of every page of the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| {
            let page = doc.get_object(id).unwrap().as_dict().unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}

/// How a fixture table draws its borders.
#[derive(Debug, Clone, Copy)]
pub enum Rules {
    /// One stroked `m`/`l` segment per row and column boundary.
    Lines,
    /// One stroked `re` rectangle per cell.
    Rects,
}

/// A ruled table placed on a notice page. Cell text may hold `\n` to wrap
/// onto several lines; empty cells draw no text.
#[derive(Debug, Clone)]
pub struct NoticeTable {
    pub left: i64,
    pub top: i64,
    pub col_widths: Vec<i64>,
    pub row_height: i64,
    pub rules: Rules,
    pub rows: Vec<Vec<&'static str>>,
}

impl NoticeTable {
    /// Three columns sized for serial, name and link, rows 40pt high.
    pub fn listing(top: i64, rules: Rules, rows: Vec<Vec<&'static str>>) -> Self {
        Self {
            left: 50,
            top,
            col_widths: vec![60, 140, 260],
            row_height: 40,
            rules,
            rows,
        }
    }

    fn draw(&self, ops: &mut Vec<Operation>) {
        let width: i64 = self.col_widths.iter().sum();
        let height = self.row_height * self.rows.len() as i64;
        let bottom = self.top - height;
        let mut col_x = vec![self.left];
        for w in &self.col_widths {
            col_x.push(col_x[col_x.len() - 1] + w);
        }

        ops.push(Operation::new("w", vec![1.into()]));
        match self.rules {
            Rules::Lines => {
                for r in 0..=self.rows.len() as i64 {
                    let y = self.top - r * self.row_height;
                    ops.push(Operation::new("m", vec![self.left.into(), y.into()]));
                    ops.push(Operation::new("l", vec![(self.left + width).into(), y.into()]));
                }
                for &x in &col_x {
                    ops.push(Operation::new("m", vec![x.into(), self.top.into()]));
                    ops.push(Operation::new("l", vec![x.into(), bottom.into()]));
                }
            }
            Rules::Rects => {
                for r in 0..self.rows.len() as i64 {
                    let y = self.top - (r + 1) * self.row_height;
                    for (c, w) in self.col_widths.iter().enumerate() {
                        ops.push(Operation::new(
                            "re",
                            vec![
                                col_x[c].into(),
                                y.into(),
                                (*w).into(),
                                self.row_height.into(),
                            ],
                        ));
                    }
                }
            }
        }
        ops.push(Operation::new("S", vec![]));

        for (r, row) in self.rows.iter().enumerate() {
            let row_top = self.top - r as i64 * self.row_height;
            for (c, cell) in row.iter().enumerate() {
                for (k, line) in cell.lines().enumerate() {
                    if line.is_empty() {
                        continue;
                    }
                    let baseline = row_top - 14 - k as i64 * LINE_GAP;
                    text_ops(ops, line, col_x[c] + 4, baseline);
                }
            }
        }
    }
}

/// A one-page notice holding `tables`.
pub fn notice_bytes(tables: &[NoticeTable]) -> Vec<u8> {
    let mut operations = Vec::new();
    for table in tables {
        table.draw(&mut operations);
    }
    build_document(vec![Content { operations }], NOTICE_WIDTH)
}

pub fn write_notice(path: &Path, tables: &[NoticeTable]) {
    std::fs::write(path, notice_bytes(tables)).unwrap();
}
