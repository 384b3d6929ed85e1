// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gallery duplication — copy a saved scan into the public picture
// collection.
//
// With scoped storage (API 29+) the entry is inserted as pending under
// `Pictures/DocumentScans`, written, and then published. Older releases need
// the legacy write permission and insert directly. If any step after the
// insert fails, the half-written entry is deleted again.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use kropscan_core::error::{KropscanError, Result};
use kropscan_core::types::{MIME_JPEG, Permission};
use tracing::{info, instrument, warn};

use crate::traits::{GalleryEntry, MediaHandle, MediaStoreWriter, NativePermissions};

/// First API level with scoped storage and `IS_PENDING`.
pub const SCOPED_STORAGE_SDK: u32 = 29;

/// Album the copies are collected in.
pub const GALLERY_ALBUM: &str = "DocumentScans";

/// Collection-relative folder for scoped-storage inserts.
pub fn gallery_relative_path() -> String {
    format!("Pictures/{GALLERY_ALBUM}")
}

/// Insert `jpeg` into the gallery as `display_name`.
///
/// Returns `PermissionDenied` (after asking for the permission again) when a
/// pre-scoped-storage device has not granted write access.
#[instrument(skip(bridge, jpeg), fields(bytes = jpeg.len(), sdk = bridge.sdk_level()))]
pub fn duplicate_to_gallery<B>(bridge: &B, jpeg: &[u8], display_name: &str) -> Result<MediaHandle>
where
    B: MediaStoreWriter + NativePermissions + ?Sized,
{
    let sdk = bridge.sdk_level();
    let scoped = sdk >= SCOPED_STORAGE_SDK;

    if !scoped {
        let permission = Permission::for_writing_images(sdk);
        if !bridge.has_permission(permission)? {
            if let Err(err) = bridge.request_permission(permission) {
                warn!(error = %err, "could not re-request storage permission");
            }
            return Err(KropscanError::PermissionDenied(
                permission.android_name().into(),
            ));
        }
    }

    let entry = GalleryEntry {
        display_name: display_name.into(),
        mime_type: MIME_JPEG.into(),
        relative_path: scoped.then(gallery_relative_path),
    };
    let handle = bridge.insert_image(&entry, scoped)?;

    let finished = bridge.write_bytes(&handle, jpeg).and_then(|()| {
        if scoped {
            bridge.clear_pending(&handle)
        } else {
            Ok(handle.clone())
        }
    });

    match finished {
        Ok(published) => {
            info!(entry = %published.0, "scan copied to gallery");
            Ok(published)
        }
        Err(err) => {
            if let Err(cleanup) = bridge.delete_entry(&handle) {
                warn!(entry = %handle.0, error = %cleanup, "failed to remove partial gallery entry");
            }
            Err(err)
        }
    }
}

const PENDING_PREFIX: &str = ".pending-";

/// Gallery backed by a plain directory, used where no media store exists.
///
/// Pending entries are dot-files renamed into place when published. The
/// entry's relative path is ignored; everything lands in `album_dir`.
#[derive(Debug, Clone)]
pub struct DirectoryMediaStore {
    album_dir: PathBuf,
}

impl DirectoryMediaStore {
    pub fn new(album_dir: impl Into<PathBuf>) -> Self {
        Self {
            album_dir: album_dir.into(),
        }
    }

    pub fn album_dir(&self) -> &Path {
        &self.album_dir
    }

    fn insert_error(path: &Path, err: std::io::Error) -> KropscanError {
        KropscanError::GalleryInsert(format!("{}: {}", path.display(), err))
    }
}

impl MediaStoreWriter for DirectoryMediaStore {
    fn insert_image(&self, entry: &GalleryEntry, pending: bool) -> Result<MediaHandle> {
        fs::create_dir_all(&self.album_dir)
            .map_err(|err| Self::insert_error(&self.album_dir, err))?;

        let name = if pending {
            format!("{PENDING_PREFIX}{}", entry.display_name)
        } else {
            entry.display_name.clone()
        };
        let path = self.album_dir.join(name);
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|err| Self::insert_error(&path, err))?;
        Ok(MediaHandle(path.display().to_string()))
    }

    fn write_bytes(&self, handle: &MediaHandle, bytes: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&handle.0)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        Ok(())
    }

    fn clear_pending(&self, handle: &MediaHandle) -> Result<MediaHandle> {
        let pending = PathBuf::from(&handle.0);
        let Some(name) = pending
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(PENDING_PREFIX))
        else {
            return Ok(handle.clone());
        };
        let published = pending.with_file_name(name);
        if published.exists() {
            return Err(Self::insert_error(
                &published,
                std::io::Error::from(ErrorKind::AlreadyExists),
            ));
        }
        fs::rename(&pending, &published)?;
        Ok(MediaHandle(published.display().to_string()))
    }

    fn delete_entry(&self, handle: &MediaHandle) -> Result<()> {
        match fs::remove_file(&handle.0) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every call; can be told to fail the write step.
    struct FakeStore {
        sdk: u32,
        granted: bool,
        fail_write: bool,
        calls: RefCell<Vec<String>>,
    }

    impl FakeStore {
        fn new(sdk: u32) -> Self {
            Self {
                sdk,
                granted: false,
                fail_write: false,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl NativePermissions for FakeStore {
        fn sdk_level(&self) -> u32 {
            self.sdk
        }

        fn has_permission(&self, permission: Permission) -> Result<bool> {
            self.calls
                .borrow_mut()
                .push(format!("check {}", permission.android_name()));
            Ok(self.granted)
        }

        fn request_permission(&self, permission: Permission) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("request {}", permission.android_name()));
            Ok(())
        }
    }

    impl MediaStoreWriter for FakeStore {
        fn insert_image(&self, entry: &GalleryEntry, pending: bool) -> Result<MediaHandle> {
            self.calls.borrow_mut().push(format!(
                "insert {} {} {:?} pending={}",
                entry.display_name, entry.mime_type, entry.relative_path, pending
            ));
            Ok(MediaHandle("content://media/1".into()))
        }

        fn write_bytes(&self, _handle: &MediaHandle, bytes: &[u8]) -> Result<()> {
            self.calls.borrow_mut().push(format!("write {}", bytes.len()));
            if self.fail_write {
                Err(KropscanError::GalleryInsert("disk full".into()))
            } else {
                Ok(())
            }
        }

        fn clear_pending(&self, handle: &MediaHandle) -> Result<MediaHandle> {
            self.calls.borrow_mut().push("publish".into());
            Ok(handle.clone())
        }

        fn delete_entry(&self, _handle: &MediaHandle) -> Result<()> {
            self.calls.borrow_mut().push("delete".into());
            Ok(())
        }
    }

    #[test]
    fn scoped_storage_inserts_pending_then_publishes() {
        let store = FakeStore::new(30);
        duplicate_to_gallery(&store, b"jpeg", "Scan_1.jpg").unwrap();
        assert_eq!(
            store.calls(),
            [
                "insert Scan_1.jpg image/jpeg Some(\"Pictures/DocumentScans\") pending=true",
                "write 4",
                "publish",
            ]
        );
    }

    #[test]
    fn legacy_storage_without_permission_re_requests() {
        let store = FakeStore::new(28);
        let err = duplicate_to_gallery(&store, b"jpeg", "Scan_1.jpg").unwrap_err();
        assert!(matches!(err, KropscanError::PermissionDenied(_)));
        assert_eq!(
            store.calls(),
            [
                "check android.permission.WRITE_EXTERNAL_STORAGE",
                "request android.permission.WRITE_EXTERNAL_STORAGE",
            ]
        );
    }

    #[test]
    fn legacy_storage_with_permission_inserts_directly() {
        let mut store = FakeStore::new(28);
        store.granted = true;
        duplicate_to_gallery(&store, b"jpeg", "Scan_1.jpg").unwrap();
        let calls = store.calls();
        assert_eq!(calls[1], "insert Scan_1.jpg image/jpeg None pending=false");
        assert_eq!(calls.last().map(String::as_str), Some("write 4"));
    }

    #[test]
    fn failed_write_removes_the_entry() {
        let mut store = FakeStore::new(33);
        store.fail_write = true;
        assert!(duplicate_to_gallery(&store, b"jpeg", "Scan_1.jpg").is_err());
        assert_eq!(store.calls().last().map(String::as_str), Some("delete"));
        assert!(!store.calls().contains(&"publish".to_string()));
    }

    #[test]
    fn directory_store_publishes_by_rename() {
        let tmp = tempfile::tempdir().unwrap();
        let album = tmp.path().join(GALLERY_ALBUM);
        let store = DirectoryMediaStore::new(&album);
        let entry = GalleryEntry {
            display_name: "Scan_42.jpg".into(),
            mime_type: MIME_JPEG.into(),
            relative_path: Some(gallery_relative_path()),
        };

        let pending = store.insert_image(&entry, true).unwrap();
        assert!(pending.0.ends_with(".pending-Scan_42.jpg"));
        store.write_bytes(&pending, b"abc").unwrap();

        let published = store.clear_pending(&pending).unwrap();
        assert_eq!(PathBuf::from(&published.0), album.join("Scan_42.jpg"));
        assert_eq!(fs::read(album.join("Scan_42.jpg")).unwrap(), b"abc");
        assert!(!PathBuf::from(&pending.0).exists());
    }

    #[test]
    fn directory_store_rejects_duplicate_names() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirectoryMediaStore::new(tmp.path());
        let entry = GalleryEntry {
            display_name: "Scan_1.jpg".into(),
            mime_type: MIME_JPEG.into(),
            relative_path: None,
        };
        store.insert_image(&entry, false).unwrap();
        let err = store.insert_image(&entry, false).unwrap_err();
        assert!(matches!(err, KropscanError::GalleryInsert(_)));
    }
}
