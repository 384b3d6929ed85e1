// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — assembling scans into PDFs and inspecting the output.

pub mod assembler;
pub mod reader;

pub use assembler::{AssembledPdf, PdfAssembler};
pub use reader::PdfReader;
