// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Timestamp-based file names for scans and exported PDFs.

use chrono::{DateTime, TimeZone};

/// Directory under the pictures folder that holds scans.
pub const SCANS_DIR: &str = "Scans";

/// Directory under the documents folder for app-private PDFs.
pub const PDFS_DIR: &str = "PDFs";

/// File name of the PDF handed to the share sheet.
pub const SHARE_CACHE_FILE: &str = "shared_scans.pdf";

/// `Scan_<epoch-ms>.jpg`
pub fn scan_file_name(epoch_ms: i64) -> String {
    format!("Scan_{epoch_ms}.jpg")
}

/// `Scans_<yyyy-MM-dd_HH-mm-ss>.pdf` in the timestamp's own zone.
pub fn pdf_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("Scans_{}.pdf", at.format("%Y-%m-%d_%H-%M-%S"))
}
