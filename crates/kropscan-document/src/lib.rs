// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// kropscan-document — image and PDF handling for KropScan.
//
// Provides image processing for the crop flow (decode, crop, rotate, JPEG
// encode, downsampled decode) and PDF assembly (one scan per page) plus a
// small lopdf-based reader for inspecting the result.

pub mod image;
pub mod pdf;

// Re-export the primary structs so callers can use `kropscan_document::PdfAssembler` etc.
pub use image::processor::ImageProcessor;
pub use pdf::assembler::{AssembledPdf, PdfAssembler};
pub use pdf::reader::PdfReader;
