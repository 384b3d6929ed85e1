// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — reactive signals for the Dioxus UI.

use std::path::PathBuf;

use kropscan_core::AppConfig;
use kropscan_core::human_errors::{HumanError, Severity};

use crate::services::app_services::AppServices;

/// Colour of a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Info,
    Error,
}

/// A transient message shown at the top of every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub detail: Option<String>,
    pub kind: BannerKind,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
            kind: BannerKind::Success,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
            kind: BannerKind::Info,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<HumanError> for Banner {
    fn from(err: HumanError) -> Self {
        let kind = match err.severity {
            Severity::ActionRequired | Severity::Unsupported => BannerKind::Info,
            Severity::Failed => BannerKind::Error,
        };
        Self {
            message: err.message,
            detail: Some(err.suggestion),
            kind,
        }
    }
}

/// Holds at most one banner. Every `show` bumps a generation counter so a
/// dismiss timer started for an older banner leaves a newer one alone.
#[derive(Debug, Clone, Default)]
pub struct BannerSlot {
    current: Option<Banner>,
    generation: u64,
}

impl BannerSlot {
    /// Replace the current banner; returns the generation to dismiss it with.
    pub fn show(&mut self, banner: Banner) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.current = Some(banner);
        self.generation
    }

    /// Clear the banner only if it is still the one from `generation`.
    pub fn dismiss(&mut self, generation: u64) -> bool {
        if self.generation == generation && self.current.is_some() {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Banner> {
        self.current.as_ref()
    }
}

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Application settings (edited on the Settings page).
    pub config: AppConfig,
    pub banner: BannerSlot,
    /// Scan opened from the browser; read by the preview page.
    pub preview: Option<PathBuf>,
    /// Bumped whenever scans are added or removed so the browser reloads.
    pub scans_revision: u64,
}

impl AppState {
    /// Create initial state from the backend services.
    pub fn new(svc: &AppServices) -> Self {
        Self {
            config: svc.config(),
            ..Self::default()
        }
    }

    pub fn scans_changed(&mut self) {
        self.scans_revision = self.scans_revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kropscan_core::human_errors::humanize_error;
    use kropscan_core::KropscanError;

    #[test]
    fn stale_dismiss_keeps_newer_banner() {
        let mut slot = BannerSlot::default();
        let first = slot.show(Banner::success("Saved"));
        let second = slot.show(Banner::info("Scan deleted"));

        assert!(!slot.dismiss(first));
        assert_eq!(slot.current().map(|b| b.message.as_str()), Some("Scan deleted"));

        assert!(slot.dismiss(second));
        assert!(slot.current().is_none());
    }

    #[test]
    fn dismiss_after_clear_is_a_no_op() {
        let mut slot = BannerSlot::default();
        let generation = slot.show(Banner::success("Saved"));
        slot.clear();
        assert!(!slot.dismiss(generation));
    }

    #[test]
    fn human_errors_become_banners() {
        let banner = Banner::from(humanize_error(&KropscanError::CropFailed("boom".into())));
        assert_eq!(banner.message, "Error cropping image");
        assert_eq!(banner.kind, BannerKind::Error);
        assert!(banner.detail.is_some());

        let banner = Banner::from(humanize_error(&KropscanError::NoFilesSelected));
        assert_eq!(banner.kind, BannerKind::Info);
    }

    #[test]
    fn scans_revision_advances() {
        let mut state = AppState::default();
        state.scans_changed();
        state.scans_changed();
        assert_eq!(state.scans_revision, 2);
    }
}
