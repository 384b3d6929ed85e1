// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, crop, rotate, downsample, and JPEG encoding for
// the crop flow and the PDF assembler. Operates on in-memory images using the
// `image` and `imageproc` crates.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use imageproc::geometric_transformations::{self, Interpolation};
use kropscan_core::error::KropscanError;
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`,
/// so edits chain:
///
/// ```ignore
/// let jpeg = ImageProcessor::from_bytes(&cropped)?
///     .rotate(90.0)
///     .to_jpeg_bytes(95)?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path at full resolution.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, KropscanError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            KropscanError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        debug!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Read only the header of an image file and return `(width, height)`.
    pub fn probe_dimensions(path: impl AsRef<Path>) -> Result<(u32, u32), KropscanError> {
        let path = path.as_ref();
        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|err| {
                KropscanError::ImageError(format!("failed to open {}: {}", path.display(), err))
            })?;
        reader.into_dimensions().map_err(|err| {
            KropscanError::ImageError(format!(
                "failed to read dimensions of {}: {}",
                path.display(),
                err
            ))
        })
    }

    /// Load an image reduced by the largest power of two that still leaves it
    /// at least `target_width` wide (height scaled proportionally).
    ///
    /// The dimensions are probed first; the full frame is decoded only long
    /// enough to be reduced.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), target_width))]
    pub fn open_downsampled(
        path: impl AsRef<Path>,
        target_width: u32,
    ) -> Result<Self, KropscanError> {
        let path = path.as_ref();
        let (width, height) = Self::probe_dimensions(path)?;
        let (req_w, req_h) = required_size(width, height, target_width);
        let sample = sample_size(width, height, req_w, req_h);

        let full = Self::open(path)?;
        if sample == 1 {
            return Ok(full);
        }

        let reduced_w = (width / sample).max(1);
        let reduced_h = (height / sample).max(1);
        let reduced = full
            .into_dynamic()
            .resize_exact(reduced_w, reduced_h, FilterType::Triangle);
        info!(width, height, sample, reduced_w, reduced_h, "Image downsampled");
        Ok(Self { image: reduced })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, KropscanError> {
        let img = image::load_from_memory(data)
            .map_err(|err| KropscanError::ImageError(format!("failed to decode image: {}", err)))?;
        debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Rotate by an angle in degrees (clockwise).
    ///
    /// Quarter turns are lossless. Other angles go through an affine warp with
    /// bilinear interpolation and a transparent-white fill.
    #[instrument(skip(self), fields(degrees))]
    pub fn rotate(self, degrees: f32) -> Self {
        let normalised = degrees.rem_euclid(360.0);
        if (normalised - 90.0).abs() < 0.01 {
            return Self {
                image: self.image.rotate90(),
            };
        }
        if (normalised - 180.0).abs() < 0.01 {
            return Self {
                image: self.image.rotate180(),
            };
        }
        if (normalised - 270.0).abs() < 0.01 {
            return Self {
                image: self.image.rotate270(),
            };
        }
        if normalised.abs() < 0.01 || (normalised - 360.0).abs() < 0.01 {
            return self;
        }

        let rgba = self.image.to_rgba8();
        let rotated: RgbaImage = geometric_transformations::rotate_about_center(
            &rgba,
            degrees.to_radians(),
            Interpolation::Bilinear,
            image::Rgba([255u8, 255, 255, 0]),
        );
        debug!("General rotation applied");
        Self {
            image: DynamicImage::ImageRgba8(rotated),
        }
    }

    /// Crop a rectangle; `x`/`y` is the top-left corner. Clamped to the image.
    #[instrument(skip(self), fields(x, y, width, height))]
    pub fn crop(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let img_w = self.image.width();
        let img_h = self.image.height();

        let safe_x = x.min(img_w.saturating_sub(1));
        let safe_y = y.min(img_h.saturating_sub(1));
        let safe_w = width.min(img_w - safe_x).max(1);
        let safe_h = height.min(img_h - safe_y).max(1);

        debug!(safe_x, safe_y, safe_w, safe_h, "Cropping image");
        Self {
            image: self.image.crop_imm(safe_x, safe_y, safe_w, safe_h),
        }
    }

    /// Crop away fractional margins (each `0.0..1.0` of the matching side).
    ///
    /// Opposite margins that together exceed the image keep a one-pixel strip.
    pub fn crop_margins(self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        let w = self.image.width() as f32;
        let h = self.image.height() as f32;
        let frac = |v: f32| v.clamp(0.0, 1.0);

        let x = (w * frac(left)).round() as u32;
        let y = (h * frac(top)).round() as u32;
        let right_px = (w * frac(right)).round() as u32;
        let bottom_px = (h * frac(bottom)).round() as u32;
        let width = self
            .image
            .width()
            .saturating_sub(x)
            .saturating_sub(right_px);
        let height = self
            .image
            .height()
            .saturating_sub(y)
            .saturating_sub(bottom_px);
        self.crop(x, y, width, height)
    }

    // -- Output ---------------------------------------------------------------

    /// Lossless PNG, used to hand a crop on without a second JPEG pass.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, KropscanError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| KropscanError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Encode as JPEG with the given quality (1-100). Alpha is discarded.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, KropscanError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| KropscanError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

// -- Downsampling helpers -----------------------------------------------------

/// Size an image must keep to be `target_width` wide at its own aspect ratio.
pub(crate) fn required_size(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    let req_h = u64::from(height) * u64::from(target_width) / u64::from(width.max(1));
    let req_h = u32::try_from(req_h).unwrap_or(u32::MAX);
    (target_width.max(1), req_h.max(1))
}

/// Largest power-of-two divisor that keeps both halves at or above the
/// requested size. 1 when the image is already small enough.
pub(crate) fn sample_size(width: u32, height: u32, req_w: u32, req_h: u32) -> u32 {
    let req_w = req_w.max(1);
    let req_h = req_h.max(1);
    let mut sample = 1;
    if height > req_h || width > req_w {
        let half_h = height / 2;
        let half_w = width / 2;
        while half_h / sample >= req_h && half_w / sample >= req_w {
            sample *= 2;
        }
    }
    sample
}
