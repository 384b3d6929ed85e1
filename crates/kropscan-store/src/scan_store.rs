// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan store — one directory of JPEG/PNG scans.
//
// Nothing is cached: every `list()` re-reads the directory so the browser
// always reflects deletes and new saves.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use kropscan_core::error::{KropscanError, Result};
use kropscan_core::types::{SCAN_EXTENSIONS, ScanFile};
use tracing::{debug, info, instrument, warn};

use crate::naming;

/// Outcome of a batch delete. Every path lands in exactly one list.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, KropscanError)>,
}

impl DeleteReport {
    pub fn all_deleted(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A folder of saved scans.
#[derive(Debug, Clone)]
pub struct ScanStore {
    dir: PathBuf,
}

impl ScanStore {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "scan store opened");
        Ok(Self { dir })
    }

    /// The `Scans` folder inside an app-private pictures directory.
    pub fn in_pictures_dir(pictures: impl AsRef<Path>) -> Result<Self> {
        Self::open(pictures.as_ref().join(naming::SCANS_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether `path` names an entry directly inside this store's directory.
    pub fn contains(&self, path: &Path) -> bool {
        path.parent() == Some(self.dir.as_path())
    }

    /// All scans, newest first. Ties are ordered by file name.
    ///
    /// A directory that has disappeared since `open` yields an empty list.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn list(&self) -> Result<Vec<ScanFile>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut scans = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if !has_scan_extension(&path) {
                continue;
            }
            match scan_file(&path) {
                Ok(Some(scan)) => scans.push(scan),
                Ok(None) => {}
                Err(err) => warn!(path = %path.display(), error = %err, "skipping scan"),
            }
        }

        scans.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
        debug!(count = scans.len(), "scans listed");
        Ok(scans)
    }

    /// Metadata for one scan.
    pub fn get(&self, path: &Path) -> Result<ScanFile> {
        match scan_file(path) {
            Ok(Some(scan)) => Ok(scan),
            Ok(None) => Err(KropscanError::ScanNotFound(path.to_path_buf())),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(KropscanError::ScanNotFound(path.to_path_buf()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Write already-encoded JPEG bytes as a new `Scan_<epoch-ms>.jpg`.
    ///
    /// The file is created exclusively; if the name is taken the timestamp is
    /// bumped one millisecond at a time. A write that fails part-way removes
    /// the file again, so a listed scan is always complete.
    #[instrument(skip(self, jpeg), fields(bytes = jpeg.len()))]
    pub fn save_jpeg(&self, jpeg: &[u8]) -> Result<ScanFile> {
        self.save_with(|file| {
            file.write_all(jpeg)?;
            file.sync_all()
        })
    }

    fn save_with(&self, fill: impl FnOnce(&mut File) -> io::Result<()>) -> Result<ScanFile> {
        let mut stamp = Utc::now().timestamp_millis();
        let (path, mut file) = loop {
            let path = self.dir.join(naming::scan_file_name(stamp));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => stamp += 1,
                Err(err) => return Err(err.into()),
            }
        };

        if let Err(err) = fill(&mut file) {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %cleanup, "could not remove partial scan");
            }
            return Err(err.into());
        }
        info!(path = %path.display(), "scan saved");
        self.get(&path)
    }

    /// Permanently remove one scan.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn delete(&self, path: &Path) -> Result<()> {
        if !self.contains(path) {
            return Err(KropscanError::DeleteFailed {
                path: path.to_path_buf(),
                reason: "not in the scan directory".into(),
            });
        }
        if !path.exists() {
            return Err(KropscanError::ScanNotFound(path.to_path_buf()));
        }
        fs::remove_file(path).map_err(|err| KropscanError::DeleteFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        info!("scan deleted");
        Ok(())
    }

    /// Delete each path independently; a failure does not stop the rest.
    pub fn delete_batch(&self, paths: &[PathBuf]) -> DeleteReport {
        let mut report = DeleteReport::default();
        for path in paths {
            match self.delete(path) {
                Ok(()) => report.deleted.push(path.clone()),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "delete failed");
                    report.failed.push((path.clone(), err));
                }
            }
        }
        info!(
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "batch delete finished"
        );
        report
    }
}

fn has_scan_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| SCAN_EXTENSIONS.contains(&ext.as_str()))
}

/// `Ok(None)` when the path exists but is not a regular file.
fn scan_file(path: &Path) -> std::io::Result<Option<ScanFile>> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Ok(None);
    }
    let modified: DateTime<Local> = meta.modified()?.into();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some(ScanFile {
        path: path.to_path_buf(),
        name,
        modified,
        size_bytes: meta.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn touch(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"\xFF\xD8\xFF\xE0fake").expect("write");
        let when = SystemTime::now() - Duration::from_secs(age_secs);
        File::options()
            .write(true)
            .open(&path)
            .and_then(|f| f.set_modified(when))
            .expect("set mtime");
        path
    }

    fn names(scans: &[ScanFile]) -> Vec<&str> {
        scans.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn list_orders_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScanStore::open(tmp.path()).unwrap();
        touch(tmp.path(), "b.jpg", 600);
        touch(tmp.path(), "a.jpg", 10);

        let scans = store.list().unwrap();
        assert_eq!(names(&scans), ["a.jpg", "b.jpg"]);
    }

    #[test]
    fn list_filters_by_extension_case_insensitively() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScanStore::open(tmp.path()).unwrap();
        touch(tmp.path(), "one.JPG", 30);
        touch(tmp.path(), "two.jpeg", 20);
        touch(tmp.path(), "three.png", 10);
        touch(tmp.path(), "notes.txt", 5);
        touch(tmp.path(), "export.pdf", 5);
        fs::create_dir(tmp.path().join("nested.jpg")).unwrap();

        let scans = store.list().unwrap();
        assert_eq!(names(&scans), ["three.png", "two.jpeg", "one.JPG"]);
    }

    #[test]
    fn list_of_vanished_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("Scans");
        let store = ScanStore::open(&dir).unwrap();
        fs::remove_dir(&dir).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn list_reflects_changes_without_caching() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScanStore::open(tmp.path()).unwrap();
        let a = touch(tmp.path(), "a.jpg", 10);
        assert_eq!(store.list().unwrap().len(), 1);

        touch(tmp.path(), "b.jpg", 5);
        assert_eq!(store.list().unwrap().len(), 2);

        store.delete(&a).unwrap();
        assert_eq!(names(&store.list().unwrap()), ["b.jpg"]);
    }

    #[test]
    fn save_jpeg_uses_scan_naming_and_never_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScanStore::in_pictures_dir(tmp.path()).unwrap();
        assert!(store.dir().ends_with("Scans"));

        let first = store.save_jpeg(b"first").unwrap();
        let second = store.save_jpeg(b"second").unwrap();

        assert_ne!(first.path, second.path);
        assert!(first.name.starts_with("Scan_") && first.name.ends_with(".jpg"));
        assert_eq!(fs::read(&first.path).unwrap(), b"first");
        assert_eq!(fs::read(&second.path).unwrap(), b"second");
        assert_eq!(second.size_bytes, 6);
    }

    #[test]
    fn failed_write_leaves_no_partial_scan() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScanStore::open(tmp.path()).unwrap();

        let err = store
            .save_with(|file| {
                file.write_all(b"\xFF\xD8 half a jpeg")?;
                Err(io::Error::new(ErrorKind::StorageFull, "disk full"))
            })
            .unwrap_err();

        assert!(matches!(err, KropscanError::Io(_)));
        assert!(store.list().unwrap().is_empty());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn get_missing_scan_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScanStore::open(tmp.path()).unwrap();
        let err = store.get(&tmp.path().join("nope.jpg")).unwrap_err();
        assert!(matches!(err, KropscanError::ScanNotFound(_)));
    }

    #[test]
    fn delete_rejects_missing_and_foreign_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScanStore::open(tmp.path().join("Scans")).unwrap();

        let missing = store.dir().join("gone.jpg");
        assert!(matches!(
            store.delete(&missing),
            Err(KropscanError::ScanNotFound(_))
        ));

        let outside = touch(tmp.path(), "outside.jpg", 1);
        assert!(matches!(
            store.delete(&outside),
            Err(KropscanError::DeleteFailed { .. })
        ));
        assert!(outside.exists());
    }

    #[test]
    fn batch_delete_continues_past_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScanStore::open(tmp.path()).unwrap();
        let a = touch(tmp.path(), "a.jpg", 30);
        let b = touch(tmp.path(), "b.jpg", 20);
        let keep = touch(tmp.path(), "keep.jpg", 10);
        let missing = tmp.path().join("missing.jpg");

        let report = store.delete_batch(&[a.clone(), missing.clone(), b.clone()]);

        assert_eq!(report.deleted, vec![a, b]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, missing);
        assert!(!report.all_deleted());

        let left = store.list().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].path, keep);
    }
}
