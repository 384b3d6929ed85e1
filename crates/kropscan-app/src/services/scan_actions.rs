// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User actions behind the pages: crop and save a scan, delete scans, export
// PDFs.
//
// Every function here blocks. Pages call them from `spawn_blocking` and turn
// the result into a banner.

use std::path::{Path, PathBuf};

use chrono::Local;
use kropscan_bridge::gallery::duplicate_to_gallery;
use kropscan_bridge::traits::{
    MediaHandle, NativeCropper, NativeImagePicker, NativePermissions, NativeShare, NativeStorage,
};
use kropscan_core::error::{KropscanError, Result};
use kropscan_core::types::{
    CropResult, MIME_PDF, Permission, PdfDestination, PdfSaveLocation, ScanFile,
};
use kropscan_document::{ImageProcessor, PdfAssembler};
use kropscan_store::DeleteReport;
use tracing::{info, instrument, warn};

use super::app_services::AppServices;
use super::paths::pdf_destination_path;

/// Manual crop applied on platforms without a native cropper.
///
/// Margins are fractions (`0.0..1.0`) of the rotated image's sides.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropEdit {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    /// Clockwise degrees, applied before the margins.
    pub rotation: f32,
}

/// What happened to the gallery copy of a saved scan.
#[derive(Debug)]
pub enum GalleryCopy {
    Disabled,
    Copied(MediaHandle),
    /// The scan itself was saved; only the copy failed.
    Failed(KropscanError),
}

#[derive(Debug)]
pub struct SavedScan {
    pub scan: ScanFile,
    pub gallery: GalleryCopy,
}

#[derive(Debug)]
pub enum CropOutcome {
    Saved(SavedScan),
    Cancelled,
}

/// Result of a PDF export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub page_count: usize,
    pub skipped: Vec<PathBuf>,
    /// `false` when the file was written but no share sheet exists here.
    pub shared: bool,
}

// -- Crop flow ---------------------------------------------------------------

/// Pick an image and run it through the native cropper.
///
/// A missing read permission is requested and reported as
/// `PermissionDenied`; the next attempt re-checks it.
#[instrument(skip(svc))]
pub fn acquire_crop(svc: &AppServices) -> Result<CropResult> {
    let bridge = svc.bridge();
    let permission = Permission::for_reading_images(bridge.sdk_level());
    if !bridge.has_permission(permission)? {
        bridge.request_permission(permission)?;
        return Err(KropscanError::PermissionDenied(
            permission.android_name().to_string(),
        ));
    }

    let Some(reference) = bridge.pick_image()? else {
        info!("image pick cancelled");
        return Ok(CropResult::Cancelled);
    };
    bridge.crop(&reference)
}

/// Crop `path` in-process. Decode and encode failures come back as
/// `CropResult::Error` so they share the native cropper's error path.
pub fn crop_locally(path: &Path, edit: &CropEdit) -> CropResult {
    let cropped = ImageProcessor::open(path).and_then(|image| {
        image
            .rotate(edit.rotation)
            .crop_margins(edit.left, edit.top, edit.right, edit.bottom)
            .to_png_bytes()
    });
    match cropped {
        Ok(bytes) => CropResult::Success(bytes),
        Err(err) => CropResult::Error(err.to_string()),
    }
}

/// Persist a crop result as a new scan.
#[instrument(skip(svc, result))]
pub fn save_crop_result(svc: &AppServices, result: CropResult) -> Result<CropOutcome> {
    let encoded = match result {
        CropResult::Success(bytes) => bytes,
        CropResult::Cancelled => {
            info!("crop cancelled");
            return Ok(CropOutcome::Cancelled);
        }
        CropResult::Error(reason) => return Err(KropscanError::CropFailed(reason)),
    };

    let config = svc.config();
    let jpeg = ImageProcessor::from_bytes(&encoded)?.to_jpeg_bytes(config.effective_jpeg_quality())?;
    let scan = svc.store().save_jpeg(&jpeg)?;

    let gallery = if config.duplicate_to_gallery {
        match duplicate_to_gallery(svc.bridge(), &jpeg, &scan.name) {
            Ok(handle) => GalleryCopy::Copied(handle),
            Err(err) => {
                warn!(error = %err, name = %scan.name, "gallery copy failed");
                GalleryCopy::Failed(err)
            }
        }
    } else {
        GalleryCopy::Disabled
    };

    Ok(CropOutcome::Saved(SavedScan { scan, gallery }))
}

// -- Scans -------------------------------------------------------------------

pub fn load_preview(svc: &AppServices, path: &Path) -> Result<ScanFile> {
    svc.store().get(path)
}

pub fn delete_scan(svc: &AppServices, path: &Path) -> Result<()> {
    svc.store().delete(path)
}

pub fn delete_scans(svc: &AppServices, paths: &[PathBuf]) -> DeleteReport {
    svc.store().delete_batch(paths)
}

// -- Export ------------------------------------------------------------------

/// "Create PDF": A4 pages written to the configured save location.
#[instrument(skip(svc, paths), fields(count = paths.len()))]
pub fn export_save(svc: &AppServices, paths: &[PathBuf]) -> Result<ExportOutcome> {
    let config = svc.config();
    let location = config.pdf_save_location;
    let mut assembler = PdfAssembler::for_save();
    assembler.set_title(&config.app_name);
    assembler.set_jpeg_quality(config.effective_jpeg_quality());
    let assembled = assembler.assemble(paths)?;

    let target = pdf_destination_path(
        svc.bridge(),
        &PdfDestination::Save(location),
        &config.app_name,
        &Local::now(),
    )?;
    let path = assembled.write_to(&target)?;

    if location == PdfSaveLocation::PublicDocuments {
        if let Err(err) = svc.bridge().notify_media_scanner(&path, MIME_PDF) {
            warn!(error = %err, path = %path.display(), "media scan request failed");
        }
    }

    info!(path = %path.display(), pages = assembled.page_count(), "PDF saved");
    Ok(ExportOutcome {
        path,
        page_count: assembled.page_count(),
        skipped: assembled.skipped().to_vec(),
        shared: false,
    })
}

/// "Share": native-size pages written to the share cache, then handed to the
/// share sheet.
#[instrument(skip(svc, paths), fields(count = paths.len()))]
pub fn export_share(svc: &AppServices, paths: &[PathBuf]) -> Result<ExportOutcome> {
    let config = svc.config();
    let mut assembler = PdfAssembler::for_share();
    assembler.set_title(&config.app_name);
    assembler.set_jpeg_quality(config.effective_jpeg_quality());
    let assembled = assembler.assemble(paths)?;

    let target = pdf_destination_path(
        svc.bridge(),
        &PdfDestination::ShareCache,
        &config.app_name,
        &Local::now(),
    )?;
    let path = assembled.write_to(&target)?;

    let shared = match svc.bridge().share_file(&path, MIME_PDF) {
        Ok(()) => true,
        Err(KropscanError::PlatformUnavailable) => {
            info!(path = %path.display(), "no share sheet; PDF left in cache");
            false
        }
        Err(err) => return Err(err),
    };

    Ok(ExportOutcome {
        path,
        page_count: assembled.page_count(),
        skipped: assembled.skipped().to_vec(),
        shared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use kropscan_bridge::stub::StubBridge;
    use kropscan_core::AppConfig;
    use kropscan_document::PdfReader;

    struct Fixture {
        _tmp: tempfile::TempDir,
        root: PathBuf,
        svc: AppServices,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let svc = AppServices::with_bridge(Arc::new(StubBridge::rooted_at(&root))).unwrap();
        Fixture {
            _tmp: tmp,
            root,
            svc,
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 40, 40])));
        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn saved(outcome: CropOutcome) -> SavedScan {
        match outcome {
            CropOutcome::Saved(saved) => saved,
            CropOutcome::Cancelled => panic!("expected a saved scan"),
        }
    }

    #[test]
    fn successful_crop_is_saved_as_jpeg_with_gallery_copy() {
        let fx = fixture();
        let saved = saved(save_crop_result(&fx.svc, CropResult::Success(png(30, 20))).unwrap());

        assert!(saved.scan.name.starts_with("Scan_"));
        assert!(saved.scan.name.ends_with(".jpg"));
        let bytes = std::fs::read(&saved.scan.path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        assert!(matches!(saved.gallery, GalleryCopy::Copied(_)));
        let copy = fx.root.join("Pictures/DocumentScans").join(&saved.scan.name);
        assert_eq!(std::fs::read(copy).unwrap(), bytes);
    }

    #[test]
    fn gallery_copy_respects_config() {
        let fx = fixture();
        fx.svc
            .save_config(&AppConfig {
                duplicate_to_gallery: false,
                ..AppConfig::default()
            })
            .unwrap();

        let saved = saved(save_crop_result(&fx.svc, CropResult::Success(png(8, 8))).unwrap());
        assert!(matches!(saved.gallery, GalleryCopy::Disabled));
        assert!(!fx.root.join("Pictures/DocumentScans").exists());
    }

    #[test]
    fn cancelled_crop_writes_nothing() {
        let fx = fixture();
        let outcome = save_crop_result(&fx.svc, CropResult::Cancelled).unwrap();
        assert!(matches!(outcome, CropOutcome::Cancelled));
        assert!(fx.svc.store().list().unwrap().is_empty());
    }

    #[test]
    fn crop_error_maps_to_crop_failed() {
        let fx = fixture();
        let err = save_crop_result(&fx.svc, CropResult::Error("widget crashed".into())).unwrap_err();
        assert!(matches!(err, KropscanError::CropFailed(reason) if reason == "widget crashed"));
    }

    #[test]
    fn undecodable_crop_bytes_are_an_image_error() {
        let fx = fixture();
        let err = save_crop_result(&fx.svc, CropResult::Success(b"not an image".to_vec()))
            .unwrap_err();
        assert!(matches!(err, KropscanError::ImageError(_)));
        assert!(fx.svc.store().list().unwrap().is_empty());
    }

    #[test]
    fn local_crop_rotates_then_trims() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("page.png");
        std::fs::write(&source, png(100, 50)).unwrap();

        let edit = CropEdit {
            left: 0.1,
            right: 0.1,
            rotation: 90.0,
            ..CropEdit::default()
        };
        let CropResult::Success(bytes) = crop_locally(&source, &edit) else {
            panic!("expected a successful crop");
        };
        let image = ImageProcessor::from_bytes(&bytes).unwrap();
        assert_eq!((image.width(), image.height()), (40, 100));
    }

    #[test]
    fn local_crop_of_missing_file_is_an_error_result() {
        let result = crop_locally(Path::new("/nonexistent/page.png"), &CropEdit::default());
        assert!(matches!(result, CropResult::Error(_)));
    }

    #[test]
    fn acquire_crop_is_unavailable_on_desktop() {
        let fx = fixture();
        assert!(matches!(
            acquire_crop(&fx.svc),
            Err(KropscanError::PlatformUnavailable)
        ));
    }

    #[test]
    fn export_save_writes_public_pdf() {
        let fx = fixture();
        let first = saved(save_crop_result(&fx.svc, CropResult::Success(png(40, 60))).unwrap());
        let second = saved(save_crop_result(&fx.svc, CropResult::Success(png(60, 40))).unwrap());

        let outcome =
            export_save(&fx.svc, &[second.scan.path.clone(), first.scan.path.clone()]).unwrap();

        assert_eq!(outcome.page_count, 2);
        assert!(outcome.skipped.is_empty());
        assert!(!outcome.shared);
        assert!(outcome.path.starts_with(fx.root.join("Documents/KropScan")));
        let reader = PdfReader::open(&outcome.path).unwrap();
        assert_eq!(reader.page_count(), 2);
    }

    #[test]
    fn export_save_to_app_documents() {
        let fx = fixture();
        fx.svc
            .save_config(&AppConfig {
                pdf_save_location: PdfSaveLocation::AppDocuments,
                ..AppConfig::default()
            })
            .unwrap();
        let scan = saved(save_crop_result(&fx.svc, CropResult::Success(png(10, 10))).unwrap());

        let outcome = export_save(&fx.svc, &[scan.scan.path]).unwrap();
        assert!(outcome.path.starts_with(fx.root.join("data/Documents/PDFs")));
    }

    #[test]
    fn export_with_no_selection_is_rejected() {
        let fx = fixture();
        assert!(matches!(
            export_save(&fx.svc, &[]),
            Err(KropscanError::NoFilesSelected)
        ));
    }

    #[test]
    fn export_of_only_unreadable_scans_writes_no_pdf() {
        let fx = fixture();
        let broken = fx.svc.store().save_jpeg(b"\xFF\xD8 truncated").unwrap();

        assert!(matches!(
            export_save(&fx.svc, &[broken.path]),
            Err(KropscanError::NoValidPages)
        ));
        let public = fx.root.join("Documents/KropScan");
        let pdfs = std::fs::read_dir(&public)
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0);
        assert_eq!(pdfs, 0);
    }

    #[test]
    fn export_share_leaves_cache_file_without_share_sheet() {
        let fx = fixture();
        let scan = saved(save_crop_result(&fx.svc, CropResult::Success(png(12, 34))).unwrap());

        let outcome = export_share(&fx.svc, &[scan.scan.path]).unwrap();
        assert!(!outcome.shared);
        assert_eq!(outcome.path, fx.root.join("cache/shared_scans.pdf"));

        let reader = PdfReader::open(&outcome.path).unwrap();
        let (w, h) = reader.page_dimensions(1).unwrap();
        assert!((w - 12.0).abs() < 0.5 && (h - 34.0).abs() < 0.5);
    }

    #[test]
    fn batch_delete_then_preview_reports_missing() {
        let fx = fixture();
        let a = saved(save_crop_result(&fx.svc, CropResult::Success(png(5, 5))).unwrap());
        let b = saved(save_crop_result(&fx.svc, CropResult::Success(png(5, 5))).unwrap());

        let report = delete_scans(&fx.svc, &[a.scan.path.clone()]);
        assert!(report.all_deleted());
        assert_eq!(fx.svc.store().list().unwrap().len(), 1);
        assert!(matches!(
            load_preview(&fx.svc, &a.scan.path),
            Err(KropscanError::ScanNotFound(_))
        ));

        delete_scan(&fx.svc, &b.scan.path).unwrap();
        assert!(fx.svc.store().list().unwrap().is_empty());
    }
}
