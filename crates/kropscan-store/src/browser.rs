// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan browser — the list shown on the scans screen plus its selection set.
//
// Two modes: `Normal` (tap opens a preview) and `Selecting` (tap toggles
// membership). Leaving `Selecting` always empties the selection.

use std::path::{Path, PathBuf};

use kropscan_core::error::Result;
use kropscan_core::types::ScanFile;
use tracing::debug;

use crate::scan_store::{DeleteReport, ScanStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseMode {
    #[default]
    Normal,
    Selecting,
}

/// What a tap on a grid item asks the UI to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// Selection membership changed; stay on the grid.
    Toggled { selected: bool },
    /// Navigate to the preview of this scan.
    OpenPreview(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct ScanBrowser {
    scans: Vec<ScanFile>,
    mode: BrowseMode,
    /// Insertion-ordered, duplicate-free.
    selected: Vec<PathBuf>,
}

impl ScanBrowser {
    pub fn new(scans: Vec<ScanFile>) -> Self {
        Self {
            scans,
            ..Self::default()
        }
    }

    /// Load the current directory contents.
    pub fn load(store: &ScanStore) -> Result<Self> {
        Ok(Self::new(store.list()?))
    }

    /// Re-read the store. Selected entries that no longer exist are dropped.
    pub fn refresh(&mut self, store: &ScanStore) -> Result<()> {
        self.replace_scans(store.list()?);
        Ok(())
    }

    /// Swap in a listing read elsewhere (e.g. on a background thread).
    pub fn replace_scans(&mut self, scans: Vec<ScanFile>) {
        self.scans = scans;
        let scans = &self.scans;
        self.selected
            .retain(|path| scans.iter().any(|scan| &scan.path == path));
        debug!(
            scans = self.scans.len(),
            selected = self.selected.len(),
            "browser refreshed"
        );
    }

    // -- Accessors --------------------------------------------------------------

    pub fn scans(&self) -> &[ScanFile] {
        &self.scans
    }

    pub fn mode(&self) -> BrowseMode {
        self.mode
    }

    pub fn is_selecting(&self) -> bool {
        self.mode == BrowseMode::Selecting
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.selected.iter().any(|p| p == path)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected paths in the order they were picked.
    pub fn selected_paths(&self) -> &[PathBuf] {
        &self.selected
    }

    /// Top bar title.
    pub fn title(&self) -> String {
        match self.mode {
            BrowseMode::Normal => "My Scans".into(),
            BrowseMode::Selecting if self.selected.is_empty() => "Select scans".into(),
            BrowseMode::Selecting => format!("{} selected", self.selected.len()),
        }
    }

    fn everything_selected(&self) -> bool {
        self.selected.len() == self.scans.len()
    }

    /// Label for the select-all toggle in the selection bar.
    pub fn select_all_label(&self) -> &'static str {
        if self.everything_selected() {
            "Select none"
        } else {
            "Select all"
        }
    }

    // -- Transitions ------------------------------------------------------------

    /// Explicit "Select" action: enter selection mode with nothing chosen.
    pub fn enter_selection(&mut self) {
        if self.mode == BrowseMode::Normal {
            self.selected.clear();
        }
        self.mode = BrowseMode::Selecting;
    }

    /// Back/close in selection mode.
    pub fn exit_selection(&mut self) {
        self.mode = BrowseMode::Normal;
        self.selected.clear();
    }

    /// Long-press on an item. Only meaningful from `Normal`.
    pub fn long_press(&mut self, path: &Path) {
        if self.mode == BrowseMode::Normal {
            self.mode = BrowseMode::Selecting;
            self.add(path);
        }
    }

    pub fn tap(&mut self, path: &Path) -> TapOutcome {
        match self.mode {
            BrowseMode::Normal => TapOutcome::OpenPreview(path.to_path_buf()),
            BrowseMode::Selecting => {
                let selected = if self.is_selected(path) {
                    self.remove(path);
                    false
                } else {
                    self.add(path);
                    true
                };
                TapOutcome::Toggled { selected }
            }
        }
    }

    /// Select everything, or nothing if everything is already selected.
    pub fn toggle_select_all(&mut self) {
        if self.everything_selected() {
            self.selected.clear();
        } else {
            self.select_all();
        }
    }

    /// "Delete all" from the menu: select every scan so the confirmation
    /// dialog can act on them.
    pub fn select_all_for_delete(&mut self) {
        self.select_all();
    }

    /// The delete confirmation was dismissed. A "Delete all" started from
    /// `Normal` gives its selection back; an ongoing selection is kept.
    pub fn cancel_delete(&mut self) {
        if self.mode == BrowseMode::Normal {
            self.selected.clear();
        }
    }

    /// Apply the result of a batch delete: drop removed scans, clear the
    /// selection, return to `Normal`.
    pub fn apply_delete(&mut self, report: &DeleteReport) {
        self.scans
            .retain(|scan| !report.deleted.iter().any(|p| p == &scan.path));
        self.exit_selection();
    }

    /// After an export the selection is finished with.
    pub fn finish_export(&mut self) {
        self.exit_selection();
    }

    fn select_all(&mut self) {
        self.selected = self.scans.iter().map(|scan| scan.path.clone()).collect();
    }

    fn add(&mut self, path: &Path) {
        if !self.is_selected(path) {
            self.selected.push(path.to_path_buf());
        }
    }

    fn remove(&mut self, path: &Path) {
        self.selected.retain(|p| p != path);
    }
}
