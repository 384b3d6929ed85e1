// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for KropScan.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// MIME type of saved scans and gallery copies.
pub const MIME_JPEG: &str = "image/jpeg";

/// MIME type handed to the share sheet for exported documents.
pub const MIME_PDF: &str = "application/pdf";

/// File extensions (lower-case) the scan store treats as scans.
pub const SCAN_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A4 in PostScript points (1/72 inch).
pub const A4_WIDTH_PT: f32 = 595.0;
pub const A4_HEIGHT_PT: f32 = 842.0;

/// Pixel width a downsampled decode must still cover for an A4 page.
pub const A4_DECODE_WIDTH: u32 = 595;

/// One saved scan on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFile {
    pub path: PathBuf,
    pub name: String,
    pub modified: DateTime<Local>,
    pub size_bytes: u64,
}

impl ScanFile {
    /// Number of characters of the file stem shown on a grid card.
    const SHORT_NAME_CHARS: usize = 15;

    /// File stem, truncated for display on a grid card.
    pub fn short_name(&self) -> String {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone());
        if stem.chars().count() > Self::SHORT_NAME_CHARS {
            let head: String = stem.chars().take(Self::SHORT_NAME_CHARS).collect();
            format!("{head}...")
        } else {
            stem
        }
    }

    /// Size in whole KiB.
    pub fn size_kb(&self) -> u64 {
        self.size_bytes / 1024
    }

    /// Timestamp as shown on a grid card, e.g. `Mar 04, 17:20`.
    pub fn card_date(&self) -> String {
        self.modified.format("%b %d, %H:%M").to_string()
    }

    /// Timestamp as shown on the preview screen, e.g. `Mar 04, 2026 17:20`.
    pub fn preview_date(&self) -> String {
        self.modified.format("%b %d, %Y %H:%M").to_string()
    }

    /// Name of the directory holding the scan.
    pub fn location(&self) -> String {
        self.path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Unknown".into())
    }
}

/// How each PDF page is sized relative to its image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PageLayout {
    /// Every page has the same size; the image is scaled to fit and centred.
    Fixed { width_pt: f32, height_pt: f32 },
    /// Each page takes the pixel dimensions of its image (1 px = 1 pt).
    Native,
}

impl PageLayout {
    pub const fn a4() -> Self {
        Self::Fixed {
            width_pt: A4_WIDTH_PT,
            height_pt: A4_HEIGHT_PT,
        }
    }
}

/// How source images are decoded before being placed on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeStrategy {
    /// Decode at full resolution.
    Full,
    /// Probe the dimensions first, then keep only a power-of-two reduction
    /// that still covers `target_width` pixels across.
    Downsampled { target_width: u32 },
}

/// Where the "Create PDF" action stores its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PdfSaveLocation {
    /// `<documents>/PDFs/` inside app-private storage.
    AppDocuments,
    /// `<public-documents>/<app-name>/`, visible to file managers.
    PublicDocuments,
}

/// Concrete output target for one PDF export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfDestination {
    /// Persist under the given location with a timestamped name.
    Save(PdfSaveLocation),
    /// Overwrite the single cache file handed to the share sheet.
    ShareCache,
}

/// Layout and decode settings for one kind of export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportPreset {
    pub layout: PageLayout,
    pub decode: DecodeStrategy,
}

impl ExportPreset {
    /// "Create PDF": A4 pages, memory-bounded decode.
    pub const fn save() -> Self {
        Self {
            layout: PageLayout::a4(),
            decode: DecodeStrategy::Downsampled {
                target_width: A4_DECODE_WIDTH,
            },
        }
    }

    /// "Share": one page per image at its own size.
    pub const fn share() -> Self {
        Self {
            layout: PageLayout::Native,
            decode: DecodeStrategy::Full,
        }
    }
}

/// Outcome reported by the external cropping widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropResult {
    /// Encoded (PNG/JPEG) bytes of the cropped image.
    Success(Vec<u8>),
    Cancelled,
    Error(String),
}

/// Runtime permissions the crop flow may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ReadMediaImages,
    ReadExternalStorage,
    WriteExternalStorage,
}

impl Permission {
    /// Android 13 (API 33) split media permissions by type.
    pub const MEDIA_PERMISSIONS_SDK: u32 = 33;

    /// Permission needed to pick an image on the given SDK level.
    pub fn for_reading_images(sdk: u32) -> Self {
        if sdk >= Self::MEDIA_PERMISSIONS_SDK {
            Self::ReadMediaImages
        } else {
            Self::ReadExternalStorage
        }
    }

    /// Permission needed to write a gallery copy on the given SDK level.
    pub fn for_writing_images(sdk: u32) -> Self {
        if sdk >= Self::MEDIA_PERMISSIONS_SDK {
            Self::ReadMediaImages
        } else {
            Self::WriteExternalStorage
        }
    }

    /// Fully qualified Android manifest name.
    pub fn android_name(&self) -> &'static str {
        match self {
            Self::ReadMediaImages => "android.permission.READ_MEDIA_IMAGES",
            Self::ReadExternalStorage => "android.permission.READ_EXTERNAL_STORAGE",
            Self::WriteExternalStorage => "android.permission.WRITE_EXTERNAL_STORAGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scan(path: &str, size_bytes: u64) -> ScanFile {
        let path = PathBuf::from(path);
        ScanFile {
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            path,
            modified: Local.with_ymd_and_hms(2026, 3, 4, 17, 20, 0).unwrap(),
            size_bytes,
        }
    }

    #[test]
    fn short_name_truncates_long_stems() {
        let long = scan("/data/Scans/Scan_1700000000000.jpg", 0);
        assert_eq!(long.short_name(), "Scan_1700000000...");

        let short = scan("/data/Scans/receipt.jpg", 0);
        assert_eq!(short.short_name(), "receipt");
    }

    #[test]
    fn size_and_location() {
        let s = scan("/data/Scans/a.jpg", 5 * 1024 + 1000);
        assert_eq!(s.size_kb(), 5);
        assert_eq!(s.location(), "Scans");
    }

    #[test]
    fn date_formats() {
        let s = scan("/data/Scans/a.jpg", 0);
        assert_eq!(s.card_date(), "Mar 04, 17:20");
        assert_eq!(s.preview_date(), "Mar 04, 2026 17:20");
    }

    #[test]
    fn permissions_follow_sdk_level() {
        assert_eq!(Permission::for_reading_images(34), Permission::ReadMediaImages);
        assert_eq!(Permission::for_reading_images(28), Permission::ReadExternalStorage);
        assert_eq!(Permission::for_writing_images(33), Permission::ReadMediaImages);
        assert_eq!(Permission::for_writing_images(26), Permission::WriteExternalStorage);
    }

    #[test]
    fn presets() {
        assert_eq!(ExportPreset::save().layout, PageLayout::a4());
        assert_eq!(
            ExportPreset::save().decode,
            DecodeStrategy::Downsampled { target_width: 595 }
        );
        assert_eq!(ExportPreset::share().layout, PageLayout::Native);
        assert_eq!(ExportPreset::share().decode, DecodeStrategy::Full);
    }
}
