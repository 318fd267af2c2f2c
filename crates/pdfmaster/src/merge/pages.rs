//! Page accumulator.
//!
//! Pages from each source document are copied into one growing document
//! with a single flat page tree. Source catalogs and page tree nodes are
//! left behind; attributes a page inherited from those nodes are folded
//! into the page itself first.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::BTreeSet;

use crate::error::{PdfMasterError, Result};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Page trees deeper than this are treated as malformed.
const MAX_TREE_DEPTH: usize = 256;

/// PDF version written by the accumulator.
const OUTPUT_VERSION: &str = "1.7";

/// In-memory document collecting pages from successive sources.
#[derive(Debug)]
pub struct PageAccumulator {
    document: Document,
    pages_id: ObjectId,
    page_count: usize,
}

impl PageAccumulator {
    /// Create an empty accumulator: a catalog and a page tree with no kids.
    pub fn new() -> Self {
        let mut document = Document::with_version(OUTPUT_VERSION);

        let pages_id = document.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        Self {
            document,
            pages_id,
            page_count: 0,
        }
    }

    /// Number of pages copied so far.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Copy every page of `source`, in its internal order, after the pages
    /// already accumulated. Returns the number of pages appended.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMasterError::MergeFailed`] if a page is not a dictionary
    /// or the accumulator's page tree is damaged.
    pub fn append(&mut self, mut source: Document) -> Result<usize> {
        source.renumber_objects_with(self.document.max_id + 1);

        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        let mut tree_nodes = BTreeSet::new();

        if let Ok(root_id) = source.trailer.get(b"Root").and_then(Object::as_reference) {
            tree_nodes.insert(root_id);
        }

        for &page_id in &page_ids {
            let (inherited, ancestors) = inherited_attributes(&source, page_id);
            tree_nodes.extend(ancestors);

            let page = source
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(|e| {
                    PdfMasterError::merge_failed(format!("Page {page_id:?} is not a dictionary: {e}"))
                })?;

            for (key, value) in inherited {
                if !page.has(&key) {
                    page.set(key, value);
                }
            }
            page.set("Parent", self.pages_id);
        }

        // Page objects never count as tree nodes, even in odd files that
        // nest a page under another page.
        for page_id in &page_ids {
            tree_nodes.remove(page_id);
        }

        let max_id = source.max_id;
        for (id, object) in source.objects {
            if tree_nodes.contains(&id) || (is_tree_node(&object) && !page_ids.contains(&id)) {
                continue;
            }
            self.document.objects.insert(id, object);
        }
        self.document.max_id = self.document.max_id.max(max_id);

        self.push_kids(&page_ids)?;
        self.page_count += page_ids.len();

        Ok(page_ids.len())
    }

    /// Hand back the accumulated document.
    pub fn into_document(self) -> Document {
        self.document
    }

    fn push_kids(&mut self, page_ids: &[ObjectId]) -> Result<()> {
        let pages = self
            .document
            .get_object_mut(self.pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| PdfMasterError::merge_failed(format!("Failed to get page tree: {e}")))?;

        let kids = pages
            .get_mut(b"Kids")
            .and_then(Object::as_array_mut)
            .map_err(|_| PdfMasterError::merge_failed("Page tree missing Kids array"))?;
        kids.extend(page_ids.iter().map(|&id| Object::Reference(id)));

        let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        pages.set("Count", count + page_ids.len() as i64);

        Ok(())
    }
}

impl Default for PageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk the `Parent` chain of `page_id`, collecting the nearest value of
/// each inheritable attribute and the ids of the visited ancestors.
fn inherited_attributes(
    doc: &Document,
    page_id: ObjectId,
) -> (Vec<(Vec<u8>, Object)>, Vec<ObjectId>) {
    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut ancestors = Vec::new();

    let mut current = parent_of(doc.get_object(page_id).and_then(Object::as_dict).ok());

    for _ in 0..MAX_TREE_DEPTH {
        let Some(node_id) = current else { break };
        if ancestors.contains(&node_id) {
            break;
        }
        ancestors.push(node_id);

        let Ok(node) = doc.get_object(node_id).and_then(Object::as_dict) else {
            break;
        };

        for key in INHERITABLE_ATTRIBUTES {
            if inherited.iter().any(|(k, _)| k.as_slice() == key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                inherited.push((key.to_vec(), value.clone()));
            }
        }

        current = parent_of(Some(node));
    }

    (inherited, ancestors)
}

fn parent_of(dict: Option<&Dictionary>) -> Option<ObjectId> {
    dict.and_then(|d| d.get(b"Parent").and_then(Object::as_reference).ok())
}

fn is_tree_node(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => matches!(
            dict.get(b"Type"),
            Ok(Object::Name(name)) if name == b"Pages" || name == b"Catalog"
        ),
        _ => false,
    }
}
