// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-language messages for the transient banners shown after an action.
//
// Nothing is retried automatically. The severity only drives the banner's
// colour and whether a suggestion line is shown.

use crate::error::KropscanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user has to do something first (grant a permission, select scans).
    ActionRequired,
    /// The action failed; trying again may work.
    Failed,
    /// The device cannot do this at all.
    Unsupported,
}

/// A human-readable error with a message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Banner headline.
    pub message: String,
    /// Follow-up hint shown under the headline.
    pub suggestion: String,
    pub severity: Severity,
}

impl HumanError {
    fn new(message: impl Into<String>, suggestion: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            severity,
        }
    }
}

/// Convert a `KropscanError` into banner text.
pub fn humanize_error(err: &KropscanError) -> HumanError {
    match err {
        KropscanError::ScanNotFound(_) => HumanError::new(
            "Scan not found",
            "It may have been deleted. Go back to refresh your scans.",
            Severity::Failed,
        ),

        KropscanError::DeleteFailed { .. } => HumanError::new(
            "Failed to delete",
            "The file could not be removed. Try again.",
            Severity::Failed,
        ),

        KropscanError::NoFilesSelected => HumanError::new(
            "No files selected",
            "Select one or more scans first.",
            Severity::ActionRequired,
        ),

        KropscanError::ImageError(_) => HumanError::new(
            "Failed to save scan",
            "The image could not be processed. Try cropping it again.",
            Severity::Failed,
        ),

        KropscanError::CropFailed(_) => HumanError::new(
            "Error cropping image",
            "Pick the image again and retry the crop.",
            Severity::Failed,
        ),

        KropscanError::PdfError(_) => HumanError::new(
            "Failed to save PDF",
            "Check that there is free storage space, then try again.",
            Severity::Failed,
        ),

        KropscanError::NoValidPages => HumanError::new(
            "No valid pages to put in the PDF",
            "None of the selected scans could be read.",
            Severity::Failed,
        ),

        KropscanError::GalleryInsert(_) => HumanError::new(
            "Saved, but could not copy to the gallery",
            "The scan is in My Scans. Gallery copies can be turned off in Settings.",
            Severity::Failed,
        ),

        KropscanError::PermissionDenied(_) => HumanError::new(
            "Storage permission required",
            "Allow access when asked, then save again.",
            Severity::ActionRequired,
        ),

        KropscanError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError::new(
                    "File not found",
                    "It may have been moved or deleted.",
                    Severity::Failed,
                )
            } else {
                HumanError::new(
                    "Storage error",
                    "Check that there is free storage space, then try again.",
                    Severity::Failed,
                )
            }
        }

        KropscanError::Serialization(_) => HumanError::new(
            "Settings could not be saved",
            "Defaults are in use. Change a setting to write them again.",
            Severity::Failed,
        ),

        KropscanError::Bridge(_) => HumanError::new(
            "Something went wrong talking to the device",
            "Try again.",
            Severity::Failed,
        ),

        KropscanError::PlatformUnavailable => HumanError::new(
            "Not available on this device",
            "This feature needs a phone or tablet.",
            Severity::Unsupported,
        ),
    }
}
