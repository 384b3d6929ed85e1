// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the platform bridge, the scan store and the
// persisted configuration.
//
// The struct is cheaply cloneable so it can be moved into `spawn_blocking`
// closures. The config sits behind a `Mutex` because the Settings page writes
// it while background actions read it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use kropscan_bridge::traits::{NativeStorage, PlatformBridge};
use kropscan_core::AppConfig;
use kropscan_core::error::Result;
use kropscan_store::ScanStore;
use tracing::{info, warn};

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
#[derive(Clone)]
pub struct AppServices {
    bridge: Arc<dyn PlatformBridge>,
    store: ScanStore,
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
}

impl AppServices {
    /// Initialise services on the platform bridge. Call once at app startup.
    pub fn init() -> Result<Self> {
        Self::with_bridge(Arc::from(kropscan_bridge::platform_bridge()))
    }

    /// Initialise on an explicit bridge.
    pub fn with_bridge(bridge: Arc<dyn PlatformBridge>) -> Result<Self> {
        let data_dir = bridge.app_data_dir()?;
        fs::create_dir_all(&data_dir)?;
        info!(
            platform = bridge.platform_name(),
            path = %data_dir.display(),
            "initialising app services"
        );

        let store = ScanStore::in_pictures_dir(bridge.pictures_dir()?)?;
        let config = load_config(&data_dir).unwrap_or_default();

        info!(scans = %store.dir().display(), "app services initialised");

        Ok(Self {
            bridge,
            store,
            data_dir,
            config: Arc::new(Mutex::new(config)),
        })
    }

    pub fn bridge(&self) -> &dyn PlatformBridge {
        self.bridge.as_ref()
    }

    pub fn store(&self) -> &ScanStore {
        &self.store
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // -- Configuration -------------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config.lock().expect("config lock poisoned").clone()
    }

    /// Update and persist the config.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        *self.config.lock().expect("config lock poisoned") = config.clone();
        persist_config(&self.data_dir, config)
    }
}

/// Handles are equal when they share the same underlying services.
impl PartialEq for AppServices {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.config, &other.config)
    }
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

/// `None` when the file is missing or unreadable; callers fall back to
/// defaults.
fn load_config(data_dir: &Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring corrupt config");
            None
        }
    }
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    fs::write(&path, json)?;
    info!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kropscan_bridge::stub::StubBridge;
    use kropscan_core::types::PdfSaveLocation;

    fn services(root: &Path) -> AppServices {
        AppServices::with_bridge(Arc::new(StubBridge::rooted_at(root))).unwrap()
    }

    #[test]
    fn init_creates_scan_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = services(tmp.path());
        assert!(svc.store().dir().is_dir());
        assert!(svc.store().dir().ends_with("Pictures/Scans"));
        assert_eq!(svc.config(), AppConfig::default());
    }

    #[test]
    fn saved_config_survives_restart() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig {
            jpeg_quality: 70,
            pdf_save_location: PdfSaveLocation::AppDocuments,
            ..AppConfig::default()
        };
        services(tmp.path()).save_config(&config).unwrap();

        assert_eq!(services(tmp.path()).config(), config);
    }

    #[test]
    fn corrupt_config_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = services(tmp.path());
        fs::write(svc.data_dir().join(CONFIG_FILE), "{ not json").unwrap();

        assert_eq!(services(tmp.path()).config(), AppConfig::default());
    }
}
