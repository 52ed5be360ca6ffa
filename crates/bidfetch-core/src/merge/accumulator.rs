//! Linear append-merge of whole PDF documents.
//!
//! Each appended document has its objects renumbered past everything
//! collected so far; its pages are re-parented under one new page tree when
//! the merged file is written.

use super::MergeError;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];
/// Parent chains deeper than this are treated as malformed.
const MAX_TREE_DEPTH: usize = 32;

#[derive(Debug, Default)]
pub struct MergeAccumulator {
    max_id: u32,
    pages: Vec<(ObjectId, Dictionary)>,
    objects: BTreeMap<ObjectId, Object>,
}

impl MergeAccumulator {
    pub fn new() -> Self {
        Self {
            max_id: 1,
            ..Self::default()
        }
    }

    /// Appends every page of the PDF at `path`. Nothing is kept on error.
    pub fn append_file(&mut self, path: &Path) -> Result<usize, MergeError> {
        let doc = Document::load(path)?;
        self.append(doc)
    }

    /// Appends every page of `doc`. Returns the number of pages added.
    pub fn append(&mut self, mut doc: Document) -> Result<usize, MergeError> {
        doc.renumber_objects_with(self.max_id);

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(MergeError::NoPages);
        }

        let mut pages = Vec::with_capacity(page_ids.len());
        for id in page_ids {
            let mut page = doc.get_object(id)?.as_dict()?.clone();
            for key in INHERITABLE {
                if !page.has(key) {
                    if let Some(value) = inherited(&doc, &page, key) {
                        page.set(key, value);
                    }
                }
            }
            pages.push((id, page));
        }

        let added = pages.len();
        self.max_id = doc.max_id + 1;
        self.pages.extend(pages);
        for (id, object) in doc.objects {
            if !is_structural(&object) {
                self.objects.insert(id, object);
            }
        }
        Ok(added)
    }

    /// Writes the merged document to `path`, replacing any existing file.
    pub fn write(self, path: &Path) -> Result<(), MergeError> {
        if self.pages.is_empty() {
            return Err(MergeError::NoPages);
        }

        let mut doc = Document::with_version("1.5");
        doc.objects = self.objects;
        let pages_id: ObjectId = (self.max_id, 0);
        let catalog_id: ObjectId = (self.max_id + 1, 0);

        let mut kids = Vec::with_capacity(self.pages.len());
        for (id, mut page) in self.pages {
            page.set("Parent", pages_id);
            doc.objects.insert(id, Object::Dictionary(page));
            kids.push(Object::Reference(id));
        }
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        doc.objects.insert(
            catalog_id,
            Object::Dictionary(dictionary! {
                "Type" => "Catalog",
                "Pages" => pages_id,
            }),
        );
        doc.trailer.set("Root", catalog_id);
        doc.max_id = catalog_id.0;

        doc.renumber_objects();
        doc.compress();
        doc.save(path)?;
        Ok(())
    }
}

/// Value of `key` on the nearest ancestor of `page` that defines it.
fn inherited(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent_id = page.get(b"Parent").and_then(Object::as_reference).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        let parent = doc.get_object(parent_id).and_then(Object::as_dict).ok()?;
        if let Ok(value) = parent.get(key) {
            return Some(value.clone());
        }
        parent_id = parent.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

/// Document-level objects rebuilt on write (catalog, page tree, outlines).
fn is_structural(object: &Object) -> bool {
    let Ok(dict) = object.as_dict() else {
        return false;
    };
    match dict.get(b"Type").and_then(Object::as_name) {
        Ok(name) => matches!(
            name,
            b"Catalog" | b"Pages" | b"Page" | b"Outlines" | b"Outline"
        ),
        Err(_) => false,
    }
}
