// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF assembler — turn an ordered list of scan files into one PDF with one
// image per page, built directly as `lopdf` objects.
//
// Inputs are re-sorted by file name before pages are assigned. Files that fail
// to decode are skipped and reported; they never abort the document. Pages
// carry their image as a DCTDecode (JPEG) stream: each decoded bitmap is
// re-encoded and dropped before the next file is opened, so at most one
// bitmap is alive and the document only grows by compressed bytes.

use std::fs;
use std::path::{Path, PathBuf};

use kropscan_core::error::{KropscanError, Result};
use kropscan_core::types::{DecodeStrategy, ExportPreset, PageLayout};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, info, instrument, warn};

use crate::image::processor::ImageProcessor;
use crate::pdf::reader::PdfReader;

/// JPEG quality of embedded page images unless overridden.
pub const DEFAULT_PAGE_QUALITY: u8 = 95;

/// Resource name of the single image on each page.
const PAGE_IMAGE: &str = "Im0";

/// A finished document held in memory.
#[derive(Debug, Clone)]
pub struct AssembledPdf {
    bytes: Vec<u8>,
    /// Source of each page, in page order.
    pages: Vec<PathBuf>,
    /// Inputs that could not be decoded.
    skipped: Vec<PathBuf>,
}

impl AssembledPdf {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[PathBuf] {
        &self.pages
    }

    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    /// Write the document to `path`, creating parent directories.
    ///
    /// The written file is re-opened and must be non-empty and carry the
    /// expected number of pages.
    #[instrument(skip(self), fields(path = %path.as_ref().display(), pages = self.page_count()))]
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &self.bytes)?;

        let written = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(KropscanError::PdfError(format!(
                "{} was not created or is empty",
                path.display()
            )));
        }
        let reread = PdfReader::open(path)?.page_count();
        if reread != self.page_count() {
            return Err(KropscanError::PdfError(format!(
                "{} has {} pages, expected {}",
                path.display(),
                reread,
                self.page_count()
            )));
        }

        info!(bytes = written, "PDF written");
        Ok(path.to_path_buf())
    }
}

/// Where an image lands on its page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Placement {
    pub page_w: f32,
    pub page_h: f32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Placement {
    pub(crate) fn for_image(layout: PageLayout, img_w: u32, img_h: u32) -> Self {
        let (w, h) = (img_w.max(1) as f32, img_h.max(1) as f32);
        match layout {
            PageLayout::Native => Self {
                page_w: w,
                page_h: h,
                x: 0.0,
                y: 0.0,
                scale: 1.0,
            },
            PageLayout::Fixed {
                width_pt,
                height_pt,
            } => {
                let scale = (width_pt / w).min(height_pt / h);
                Self {
                    page_w: width_pt,
                    page_h: height_pt,
                    x: (width_pt - w * scale) / 2.0,
                    y: (height_pt - h * scale) / 2.0,
                    scale,
                }
            }
        }
    }
}

/// Builds multi-page PDFs from scan files.
pub struct PdfAssembler {
    preset: ExportPreset,
    title: String,
    jpeg_quality: u8,
}

impl PdfAssembler {
    pub fn new(preset: ExportPreset) -> Self {
        Self {
            preset,
            title: "Scans".into(),
            jpeg_quality: DEFAULT_PAGE_QUALITY,
        }
    }

    /// A4 pages with downsampled decode, for saving.
    pub fn for_save() -> Self {
        Self::new(ExportPreset::save())
    }

    /// Native-size pages with full decode, for sharing.
    pub fn for_share() -> Self {
        Self::new(ExportPreset::share())
    }

    /// Title written to the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// JPEG quality (1-100) used to embed page images.
    pub fn set_jpeg_quality(&mut self, quality: u8) {
        self.jpeg_quality = quality.clamp(1, 100);
    }

    /// Assemble `files` (any order) into one document.
    ///
    /// Fails with `NoFilesSelected` for an empty list and `NoValidPages` when
    /// nothing decodes.
    #[instrument(skip(self, files), fields(inputs = files.len(), layout = ?self.preset.layout))]
    pub fn assemble(&self, files: &[PathBuf]) -> Result<AssembledPdf> {
        if files.is_empty() {
            return Err(KropscanError::NoFilesSelected);
        }

        let mut sorted = files.to_vec();
        sorted.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(sorted.len());
        let mut pages = Vec::with_capacity(sorted.len());
        let mut skipped = Vec::new();

        for path in sorted {
            let encoded = self
                .decode(&path)
                .and_then(|image| {
                    let size = (image.width(), image.height());
                    image.to_jpeg_bytes(self.jpeg_quality).map(|jpeg| (size, jpeg))
                });
            let ((img_w, img_h), jpeg) = match encoded {
                Ok(encoded) => encoded,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping undecodable scan");
                    skipped.push(path);
                    continue;
                }
            };

            let placement = Placement::for_image(self.preset.layout, img_w, img_h);
            let jpeg_len = jpeg.len();
            let page_id = add_page(&mut doc, pages_id, &placement, (img_w, img_h), jpeg)?;
            kids.push(Object::Reference(page_id));

            debug!(
                page = pages.len() + 1,
                path = %path.display(),
                img_w,
                img_h,
                jpeg_bytes = jpeg_len,
                scale = placement.scale,
                "page added"
            );
            pages.push(path);
        }

        if kids.is_empty() {
            warn!(skipped = skipped.len(), "no page could be produced");
            return Err(KropscanError::NoValidPages);
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(count),
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(self.title.as_str()),
            "Producer" => Object::string_literal("KropScan"),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|err| KropscanError::PdfError(format!("failed to serialise PDF: {err}")))?;

        info!(
            pages = pages.len(),
            skipped = skipped.len(),
            bytes = bytes.len(),
            "PDF assembled"
        );
        Ok(AssembledPdf {
            bytes,
            pages,
            skipped,
        })
    }

    fn decode(&self, path: &Path) -> Result<ImageProcessor> {
        match self.preset.decode {
            DecodeStrategy::Full => ImageProcessor::open(path),
            DecodeStrategy::Downsampled { target_width } => {
                ImageProcessor::open_downsampled(path, target_width)
            }
        }
    }
}

/// Add one page showing a JPEG image at `placement`. Takes ownership of the
/// encoded bytes; the pixels themselves are never stored.
fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    placement: &Placement,
    (img_w, img_h): (u32, u32),
    jpeg: Vec<u8>,
) -> Result<ObjectId> {
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(img_w)),
            "Height" => Object::Integer(i64::from(img_h)),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));

    // Image space is the unit square; `cm` scales it to the drawn size.
    let drawn_w = img_w.max(1) as f32 * placement.scale;
    let drawn_h = img_h.max(1) as f32 * placement.scale;
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(drawn_w),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(drawn_h),
                    Object::Real(placement.x),
                    Object::Real(placement.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(PAGE_IMAGE.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content = content
        .encode()
        .map_err(|err| KropscanError::PdfError(format!("failed to encode page content: {err}")))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(placement.page_w),
            Object::Real(placement.page_h),
        ],
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                PAGE_IMAGE => Object::Reference(image_id),
            },
        },
        "Contents" => Object::Reference(content_id),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_image(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([120, 130, 140]))
            .save(&path)
            .expect("save test image");
        path
    }

    fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 0.5 && (actual.1 - expected.1).abs() < 0.5,
            "expected ~{expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn undecodable_files_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_image(tmp.path(), "a.jpg", 30, 40);
        let b = write_image(tmp.path(), "b.png", 30, 40);
        let c = tmp.path().join("c.jpg");
        fs::write(&c, b"this is not a jpeg").unwrap();

        let pdf = PdfAssembler::for_share().assemble(&[c.clone(), a, b]).unwrap();

        assert_eq!(pdf.page_count(), 2);
        assert_eq!(pdf.skipped(), [c]);
        assert_eq!(PdfReader::from_bytes(pdf.bytes()).unwrap().page_count(), 2);
    }

    #[test]
    fn nothing_decodable_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let bad = tmp.path().join("bad.jpg");
        fs::write(&bad, b"garbage").unwrap();
        let missing = tmp.path().join("missing.jpg");

        let err = PdfAssembler::for_save().assemble(&[bad, missing]).unwrap_err();
        assert!(matches!(err, KropscanError::NoValidPages));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = PdfAssembler::for_save().assemble(&[]).unwrap_err();
        assert!(matches!(err, KropscanError::NoFilesSelected));
    }

    #[test]
    fn pages_follow_file_name_order_not_input_order() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_image(tmp.path(), "a.jpg", 40, 20);
        let b = write_image(tmp.path(), "b.jpg", 20, 40);

        let pdf = PdfAssembler::for_share().assemble(&[b.clone(), a.clone()]).unwrap();
        assert_eq!(pdf.pages(), [a, b]);

        let reader = PdfReader::from_bytes(pdf.bytes()).unwrap();
        assert_close(reader.page_dimensions(1).unwrap(), (40.0, 20.0));
        assert_close(reader.page_dimensions(2).unwrap(), (20.0, 40.0));
    }

    #[test]
    fn fixed_layout_uses_a4_pages() {
        let tmp = tempfile::tempdir().unwrap();
        let wide = write_image(tmp.path(), "wide.jpg", 300, 100);
        let tall = write_image(tmp.path(), "tall.jpg", 1400, 2000);

        let pdf = PdfAssembler::for_save().assemble(&[wide, tall]).unwrap();
        let reader = PdfReader::from_bytes(pdf.bytes()).unwrap();
        for page in 1..=2 {
            assert_close(reader.page_dimensions(page).unwrap(), (595.0, 842.0));
        }
    }

    #[test]
    fn fixed_placement_letterboxes() {
        let p = Placement::for_image(PageLayout::a4(), 1190, 842);
        assert!((p.scale - 0.5).abs() < 1e-6);
        assert!(p.x.abs() < 1e-3);
        assert!((p.y - 210.5).abs() < 1e-3);

        // Small images are scaled up to fill the page width or height.
        let p = Placement::for_image(PageLayout::a4(), 100, 100);
        assert!((p.scale - 5.95).abs() < 1e-4);
        assert!((p.y - (842.0 - 595.0) / 2.0).abs() < 1e-3);
    }

    #[test]
    fn native_placement_matches_image() {
        let p = Placement::for_image(PageLayout::Native, 640, 480);
        assert_eq!((p.page_w, p.page_h, p.x, p.y, p.scale), (640.0, 480.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn pages_hold_jpeg_streams_not_raw_pixels() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_image(tmp.path(), "a.png", 600, 800);
        let b = write_image(tmp.path(), "b.png", 600, 800);
        let raw_pixels = 2 * 600 * 800 * 3;

        let mut assembler = PdfAssembler::for_share();
        assembler.set_jpeg_quality(80);
        let pdf = assembler.assemble(&[a, b]).unwrap();
        assert!(pdf.bytes().len() < raw_pixels / 4);

        let doc = Document::load_mem(pdf.bytes()).unwrap();
        let images: Vec<_> = doc
            .objects
            .values()
            .filter_map(|obj| obj.as_stream().ok())
            .filter(|stream| {
                stream.dict.get(b"Subtype").and_then(|s| s.as_name()).ok() == Some(&b"Image"[..])
            })
            .collect();
        assert_eq!(images.len(), 2);
        for image in images {
            assert_eq!(
                image.dict.get(b"Filter").and_then(|f| f.as_name()).ok(),
                Some(&b"DCTDecode"[..])
            );
            assert_eq!(&image.content[..2], &[0xFF, 0xD8]);
        }
    }

    #[test]
    fn title_lands_in_document_info() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_image(tmp.path(), "a.jpg", 20, 20);
        let mut assembler = PdfAssembler::for_save();
        assembler.set_title("KropScan");
        let pdf = assembler.assemble(&[a]).unwrap();

        let doc = Document::load_mem(pdf.bytes()).unwrap();
        let info_id = doc.trailer.get(b"Info").and_then(|i| i.as_reference()).unwrap();
        let title = doc
            .get_dictionary(info_id)
            .and_then(|d| d.get(b"Title"))
            .and_then(|t| t.as_str())
            .unwrap();
        assert_eq!(title, b"KropScan");
    }

    #[test]
    fn write_to_creates_directories_and_verifies() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_image(tmp.path(), "a.jpg", 20, 20);
        let pdf = PdfAssembler::for_save().assemble(&[a]).unwrap();

        let target = tmp.path().join("Documents").join("PDFs").join("out.pdf");
        let written = pdf.write_to(&target).unwrap();

        assert_eq!(written, target);
        assert!(fs::metadata(&target).unwrap().len() > 0);
        assert_eq!(PdfReader::open(&target).unwrap().page_count(), 1);
    }
}
