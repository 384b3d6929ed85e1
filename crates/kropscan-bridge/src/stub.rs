// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native mobile APIs are unavailable.
//
// Storage maps onto conventional desktop directories and the gallery is a
// plain directory. The picker, cropper and share sheet are not available; the
// desktop UI uses its own file dialog and crop controls instead.

use std::path::{Path, PathBuf};

use kropscan_core::error::{KropscanError, Result};
use kropscan_core::types::{CropResult, Permission};

use crate::gallery::{DirectoryMediaStore, GALLERY_ALBUM, SCOPED_STORAGE_SDK};
use crate::traits::*;

const APP_DIR: &str = "kropscan";

/// Bridge returned on non-mobile platforms.
pub struct StubBridge {
    data_root: PathBuf,
    cache_root: PathBuf,
    public_documents: PathBuf,
    gallery: DirectoryMediaStore,
}

impl StubBridge {
    /// Resolve locations from `XDG_*` variables and `HOME`.
    pub fn from_env() -> Self {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        let data = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".local").join("share"));
        let cache = std::env::var_os("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".cache"));
        let documents = std::env::var_os("XDG_DOCUMENTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join("Documents"));
        let pictures = std::env::var_os("XDG_PICTURES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join("Pictures"));

        Self {
            data_root: data.join(APP_DIR),
            cache_root: cache.join(APP_DIR),
            public_documents: documents,
            gallery: DirectoryMediaStore::new(pictures.join(GALLERY_ALBUM)),
        }
    }

    /// Put every location under `root`. Used by tests.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            data_root: root.join("data"),
            cache_root: root.join("cache"),
            public_documents: root.join("Documents"),
            gallery: DirectoryMediaStore::new(root.join("Pictures").join(GALLERY_ALBUM)),
        }
    }

    pub fn gallery_dir(&self) -> &Path {
        self.gallery.album_dir()
    }
}

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativeImagePicker for StubBridge {
    fn pick_image(&self) -> Result<Option<String>> {
        tracing::warn!("NativeImagePicker::pick_image called on stub bridge");
        Err(KropscanError::PlatformUnavailable)
    }
}

impl NativeCropper for StubBridge {
    fn crop(&self, _reference: &str) -> Result<CropResult> {
        tracing::warn!("NativeCropper::crop called on stub bridge");
        Err(KropscanError::PlatformUnavailable)
    }
}

impl NativeShare for StubBridge {
    fn share_file(&self, path: &Path, _mime_type: &str) -> Result<()> {
        tracing::warn!(path = %path.display(), "NativeShare::share_file called on stub bridge");
        Err(KropscanError::PlatformUnavailable)
    }
}

impl NativePermissions for StubBridge {
    /// Desktop behaves like a scoped-storage device.
    fn sdk_level(&self) -> u32 {
        SCOPED_STORAGE_SDK
    }

    fn has_permission(&self, _permission: Permission) -> Result<bool> {
        Ok(true)
    }

    fn request_permission(&self, _permission: Permission) -> Result<()> {
        Ok(())
    }
}

impl NativeStorage for StubBridge {
    fn app_data_dir(&self) -> Result<PathBuf> {
        Ok(self.data_root.clone())
    }

    fn pictures_dir(&self) -> Result<PathBuf> {
        Ok(self.data_root.join("Pictures"))
    }

    fn documents_dir(&self) -> Result<PathBuf> {
        Ok(self.data_root.join("Documents"))
    }

    fn public_documents_dir(&self) -> Result<PathBuf> {
        Ok(self.public_documents.clone())
    }

    fn cache_dir(&self) -> Result<PathBuf> {
        Ok(self.cache_root.clone())
    }

    fn notify_media_scanner(&self, path: &Path, _mime_type: &str) -> Result<()> {
        tracing::debug!(path = %path.display(), "no media index on desktop");
        Ok(())
    }
}

impl MediaStoreWriter for StubBridge {
    fn insert_image(&self, entry: &GalleryEntry, pending: bool) -> Result<MediaHandle> {
        self.gallery.insert_image(entry, pending)
    }

    fn write_bytes(&self, handle: &MediaHandle, bytes: &[u8]) -> Result<()> {
        self.gallery.write_bytes(handle, bytes)
    }

    fn clear_pending(&self, handle: &MediaHandle) -> Result<MediaHandle> {
        self.gallery.clear_pending(handle)
    }

    fn delete_entry(&self, handle: &MediaHandle) -> Result<()> {
        self.gallery.delete_entry(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::duplicate_to_gallery;

    #[test]
    fn rooted_locations_stay_under_root() {
        let tmp = tempfile::tempdir().unwrap();
        let bridge = StubBridge::rooted_at(tmp.path());
        assert!(bridge.pictures_dir().unwrap().starts_with(tmp.path()));
        assert!(bridge.documents_dir().unwrap().starts_with(tmp.path()));
        assert!(bridge.public_documents_dir().unwrap().starts_with(tmp.path()));
        assert!(bridge.cache_dir().unwrap().starts_with(tmp.path()));
    }

    #[test]
    fn gallery_copy_lands_in_album_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let bridge = StubBridge::rooted_at(tmp.path());
        duplicate_to_gallery(&bridge, b"\xFF\xD8jpeg", "Scan_7.jpg").unwrap();
        let copy = bridge.gallery_dir().join("Scan_7.jpg");
        assert_eq!(std::fs::read(copy).unwrap(), b"\xFF\xD8jpeg");
    }

    #[test]
    fn share_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let bridge = StubBridge::rooted_at(tmp.path());
        assert!(matches!(
            bridge.share_file(Path::new("x.pdf"), "application/pdf"),
            Err(KropscanError::PlatformUnavailable)
        ));
    }
}
