// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Where exported PDFs go.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use kropscan_bridge::traits::NativeStorage;
use kropscan_core::error::Result;
use kropscan_core::types::{PdfDestination, PdfSaveLocation};
use kropscan_store::naming::{PDFS_DIR, SHARE_CACHE_FILE, pdf_file_name};

/// Resolve the file an export to `destination` at time `now` writes.
///
/// Saved PDFs get a timestamped name; the share cache is a fixed file that
/// each share overwrites.
pub fn pdf_destination_path<S>(
    storage: &S,
    destination: &PdfDestination,
    app_name: &str,
    now: &DateTime<Local>,
) -> Result<PathBuf>
where
    S: NativeStorage + ?Sized,
{
    let path = match destination {
        PdfDestination::Save(PdfSaveLocation::AppDocuments) => storage
            .documents_dir()?
            .join(PDFS_DIR)
            .join(pdf_file_name(now)),
        PdfDestination::Save(PdfSaveLocation::PublicDocuments) => storage
            .public_documents_dir()?
            .join(app_name)
            .join(pdf_file_name(now)),
        PdfDestination::ShareCache => storage.cache_dir()?.join(SHARE_CACHE_FILE),
    };
    Ok(path)
}
