// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.
//
// The crop flow and the exporters only ever talk to the OS through these
// traits. Platforms without a capability return
// `KropscanError::PlatformUnavailable`.

use std::path::{Path, PathBuf};

use kropscan_core::error::Result;
use kropscan_core::types::{CropResult, Permission};

/// Unified bridge that groups all native capabilities.
pub trait PlatformBridge:
    NativeImagePicker
    + NativeCropper
    + NativeShare
    + NativePermissions
    + NativeStorage
    + MediaStoreWriter
    + Send
    + Sync
{
    /// Human-readable platform name (e.g. "Android", "Desktop (stub)").
    fn platform_name(&self) -> &str;
}

/// Let the user choose an image from the device.
pub trait NativeImagePicker {
    /// Show the system image picker. Returns a content reference (URI or
    /// path), or `None` if the user backed out.
    fn pick_image(&self) -> Result<Option<String>>;
}

/// Hand an image to the platform's interactive cropping UI.
pub trait NativeCropper {
    /// Blocks until the cropper finishes.
    fn crop(&self, reference: &str) -> Result<CropResult>;
}

/// Share content via the OS share sheet.
pub trait NativeShare {
    fn share_file(&self, path: &Path, mime_type: &str) -> Result<()>;
}

/// Runtime permission checks and prompts.
pub trait NativePermissions {
    /// Platform API level used for version-gated behaviour.
    fn sdk_level(&self) -> u32;

    fn has_permission(&self, permission: Permission) -> Result<bool>;

    /// Ask the user for `permission`. The answer arrives later; callers
    /// re-check on their next attempt.
    fn request_permission(&self, permission: Permission) -> Result<()>;
}

/// Well-known storage locations.
pub trait NativeStorage {
    /// App-private directory for settings.
    fn app_data_dir(&self) -> Result<PathBuf>;

    /// App-private pictures directory (scans live in `Scans/` below it).
    fn pictures_dir(&self) -> Result<PathBuf>;

    /// App-private documents directory.
    fn documents_dir(&self) -> Result<PathBuf>;

    /// Shared documents directory visible to file managers.
    fn public_documents_dir(&self) -> Result<PathBuf>;

    fn cache_dir(&self) -> Result<PathBuf>;

    /// Tell the media index that `path` was created or changed.
    fn notify_media_scanner(&self, path: &Path, mime_type: &str) -> Result<()>;
}

/// Metadata for a new gallery entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    pub display_name: String,
    pub mime_type: String,
    /// Collection-relative folder, e.g. `Pictures/DocumentScans`. `None` puts
    /// the entry in the collection root.
    pub relative_path: Option<String>,
}

/// Opaque reference to an inserted gallery entry (a content URI on Android,
/// a file path on desktop).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle(pub String);

/// Low-level media store operations. [`crate::gallery::duplicate_to_gallery`]
/// sequences them.
pub trait MediaStoreWriter {
    /// Create an entry. A `pending` entry stays hidden from other apps until
    /// [`clear_pending`](MediaStoreWriter::clear_pending) is called.
    fn insert_image(&self, entry: &GalleryEntry, pending: bool) -> Result<MediaHandle>;

    fn write_bytes(&self, handle: &MediaHandle, bytes: &[u8]) -> Result<()>;

    /// Publish a pending entry. Returns the handle that now names it.
    fn clear_pending(&self, handle: &MediaHandle) -> Result<MediaHandle>;

    fn delete_entry(&self, handle: &MediaHandle) -> Result<()>;
}
