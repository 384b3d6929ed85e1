// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::types::PdfSaveLocation;

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JPEG quality (1-100) used when a cropped image is saved as a scan.
    pub jpeg_quality: u8,
    /// Also insert every saved scan into the public photo gallery.
    pub duplicate_to_gallery: bool,
    /// Where "Create PDF" writes its output.
    pub pdf_save_location: PdfSaveLocation,
    /// How long success/error banners stay on screen.
    pub banner_seconds: u64,
    /// Folder name used under the public documents directory.
    pub app_name: String,
}

impl AppConfig {
    /// JPEG quality clamped to the range the encoder accepts.
    pub fn effective_jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 95,
            duplicate_to_gallery: true,
            pdf_save_location: PdfSaveLocation::PublicDocuments,
            banner_seconds: 3,
            app_name: "KropScan".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "duplicate_to_gallery": false }"#).expect("parse");
        assert!(!config.duplicate_to_gallery);
        assert_eq!(config.jpeg_quality, 95);
        assert_eq!(config.app_name, "KropScan");
        assert_eq!(config.pdf_save_location, PdfSaveLocation::PublicDocuments);
    }

    #[test]
    fn json_round_trip_preserves_settings() {
        let config = AppConfig {
            jpeg_quality: 80,
            pdf_save_location: PdfSaveLocation::AppDocuments,
            ..AppConfig::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let back: AppConfig = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, config);
    }

    #[test]
    fn jpeg_quality_is_clamped() {
        let zero = AppConfig {
            jpeg_quality: 0,
            ..AppConfig::default()
        };
        let high = AppConfig {
            jpeg_quality: 250,
            ..AppConfig::default()
        };
        assert_eq!(zero.effective_jpeg_quality(), 1);
        assert_eq!(high.effective_jpeg_quality(), 100);
    }
}
