// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open an existing PDF with `lopdf` and report its pages. Used to
// verify exported documents.

use std::collections::BTreeSet;
use std::path::Path;

use kropscan_core::error::KropscanError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, instrument};

/// Read-only view over a PDF document.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, KropscanError> {
        let path_ref = path.as_ref();
        let document = Document::load(path_ref).map_err(|err| {
            KropscanError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, KropscanError> {
        let document = Document::load_mem(data).map_err(|err| {
            KropscanError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height in points of page `page_number` (1-indexed).
    ///
    /// The MediaBox is looked up on the page and then on each ancestor in the
    /// page tree. A `Parent` chain that revisits a node is an error.
    pub fn page_dimensions(&self, page_number: u32) -> Result<(f64, f64), KropscanError> {
        let pages = self.document.get_pages();
        let page_id = *pages.get(&page_number).ok_or_else(|| {
            KropscanError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_number,
                pages.len()
            ))
        })?;

        let mut visited: BTreeSet<ObjectId> = BTreeSet::new();
        let mut current: Option<ObjectId> = Some(page_id);
        while let Some(id) = current {
            if !visited.insert(id) {
                return Err(KropscanError::PdfError(format!(
                    "page tree of page {} loops at object {} {}",
                    page_number, id.0, id.1
                )));
            }
            let dict = self
                .document
                .get_object(id)
                .and_then(|o| o.as_dict())
                .map_err(|err| KropscanError::PdfError(format!("bad page object: {}", err)))?;
            if let Some(size) = self.media_box(dict) {
                return Ok(size);
            }
            current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok();
        }

        Err(KropscanError::PdfError(format!(
            "page {} has no MediaBox",
            page_number
        )))
    }

    fn media_box(&self, dict: &Dictionary) -> Option<(f64, f64)> {
        let raw = dict.get(b"MediaBox").ok()?;
        let resolved = match raw {
            Object::Reference(id) => self.document.get_object(*id).ok()?,
            other => other,
        };
        let arr = resolved.as_array().ok()?;
        if arr.len() != 4 {
            return None;
        }
        let llx = number(&arr[0])?;
        let lly = number(&arr[1])?;
        let urx = number(&arr[2])?;
        let ury = number(&arr[3])?;
        Some((urx - llx, ury - lly))
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn two_page_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let first = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(612), Object::Integer(792)],
        });
        // Second page inherits its MediaBox from the page tree.
        let second = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(first), Object::Reference(second)],
                "Count" => 2,
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Real(595.0), Object::Real(842.0)],
            }),
        );
        let catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn reports_own_and_inherited_media_boxes() {
        let reader = PdfReader::from_bytes(&two_page_pdf()).unwrap();
        assert_eq!(reader.page_count(), 2);
        assert_eq!(reader.page_dimensions(1).unwrap(), (612.0, 792.0));
        assert_eq!(reader.page_dimensions(2).unwrap(), (595.0, 842.0));
    }

    #[test]
    fn out_of_range_page_is_an_error() {
        let reader = PdfReader::from_bytes(&two_page_pdf()).unwrap();
        assert!(matches!(
            reader.page_dimensions(3),
            Err(KropscanError::PdfError(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(PdfReader::from_bytes(b"%PDF-nope").is_err());
    }

    #[test]
    fn open_reads_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("two.pdf");
        std::fs::write(&path, two_page_pdf()).unwrap();
        assert_eq!(PdfReader::open(&path).unwrap().page_count(), 2);
    }

    #[test]
    fn parent_cycle_is_an_error() {
        // Page 1 has no MediaBox and its Pages node lists itself as Parent.
        let mut reader = PdfReader::from_bytes(&two_page_pdf()).unwrap();
        let page_id = reader.document.get_pages()[&1];
        let pages_id = reader
            .document
            .get_object(page_id)
            .and_then(|o| o.as_dict())
            .and_then(|d| d.get(b"Parent"))
            .and_then(|p| p.as_reference())
            .unwrap();
        if let Ok(Object::Dictionary(page)) = reader.document.get_object_mut(page_id) {
            page.remove(b"MediaBox");
        }
        if let Ok(Object::Dictionary(pages)) = reader.document.get_object_mut(pages_id) {
            pages.remove(b"MediaBox");
            pages.set("Parent", Object::Reference(pages_id));
        }

        assert!(matches!(
            reader.page_dimensions(1),
            Err(KropscanError::PdfError(msg)) if msg.contains("loops")
        ));
    }
}
