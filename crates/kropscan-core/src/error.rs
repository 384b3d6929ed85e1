// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for KropScan.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all KropScan operations.
#[derive(Debug, Error)]
pub enum KropscanError {
    // -- Scan store --
    #[error("scan not found: {}", .0.display())]
    ScanNotFound(PathBuf),

    #[error("failed to delete {}: {reason}", path.display())]
    DeleteFailed { path: PathBuf, reason: String },

    #[error("no files selected")]
    NoFilesSelected,

    // -- Image / crop --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("cropping failed: {0}")]
    CropFailed(String),

    // -- PDF --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("none of the selected scans could be decoded")]
    NoValidPages,

    // -- Gallery / permissions --
    #[error("gallery insertion failed: {0}")]
    GalleryInsert(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KropscanError>;
