// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// kropscan-store — the scan directory and the browser built on top of it.
//
// `ScanStore` owns one folder of JPEG/PNG scans (list, get, save, delete).
// `ScanBrowser` is the in-memory Normal/Selecting state machine the scans
// screen renders from.

pub mod browser;
pub mod naming;
pub mod scan_store;

pub use browser::{BrowseMode, ScanBrowser, TapOutcome};
pub use scan_store::{DeleteReport, ScanStore};
