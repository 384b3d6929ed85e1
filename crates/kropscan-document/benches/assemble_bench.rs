// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for PDF assembly in the kropscan-document crate.

use std::path::PathBuf;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};

use kropscan_document::PdfAssembler;

/// Write `count` synthetic 1200x1600 JPEG scans into `dir`.
fn synthetic_scans(dir: &std::path::Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("Scan_{i:04}.jpg"));
            let mut img = RgbImage::from_pixel(1200, 1600, Rgb([245, 245, 240]));
            for y in (100..1500).step_by(40) {
                for x in 100..1100 {
                    img.put_pixel(x, y, Rgb([20, 20, 20]));
                }
            }
            img.save(&path).expect("write synthetic scan");
            path
        })
        .collect()
}

/// Save preset: A4 pages with downsampled decode.
fn bench_assemble_save(c: &mut Criterion) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let scans = synthetic_scans(tmp.path(), 4);
    let assembler = PdfAssembler::for_save();

    c.bench_function("assemble_save (4 x 1200x1600)", |b| {
        b.iter(|| {
            let pdf = assembler.assemble(black_box(&scans)).expect("assemble");
            black_box(pdf.bytes().len());
        });
    });
}

/// Share preset: native-size pages, full decode.
fn bench_assemble_share(c: &mut Criterion) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let scans = synthetic_scans(tmp.path(), 4);
    let assembler = PdfAssembler::for_share();

    c.bench_function("assemble_share (4 x 1200x1600)", |b| {
        b.iter(|| {
            let pdf = assembler.assemble(black_box(&scans)).expect("assemble");
            black_box(pdf.bytes().len());
        });
    });
}

criterion_group!(benches, bench_assemble_save, bench_assemble_share);
criterion_main!(benches);
