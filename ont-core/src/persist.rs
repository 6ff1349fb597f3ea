/*!
 * PERSIST - Durable writes of JSON datasets
 *
 * ROLE:
 * Writes a record array so that a crash never leaves a half-written dataset,
 * and keeps a copy of whatever the destination held before.
 *
 * HOW IT WORKS:
 * - Pretty JSON (2-space indent, UTF-8 kept as-is) into `.tmp-<name>`
 * - fsync the temp file, then byte-exact backup of the old file into
 *   `<stem>-backup-<YYYYmmdd-HHMMSS>[-N].json`
 * - Rename over the destination, fsync the parent directory
 * - A failed backup only warns; a failed write leaves the old file in place
 *
 * BACKUP NAMES:
 * `onts.json` -> `onts-backup-20240501-101500.json`, then `-1`, `-2`...
 * when several saves land in the same second.
 */

use crate::error::StoreError;
use chrono::Local;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Where a save landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    /// Copy of the previous file contents, if there was a previous file and
    /// the copy succeeded
    pub backup: Option<PathBuf>,
    pub records: usize,
}

/// Writes datasets atomically and keeps backups in `backup_dir`.
#[derive(Debug, Clone)]
pub struct Persister {
    backup_dir: PathBuf,
}

impl Persister {
    pub fn new<P: Into<PathBuf>>(backup_dir: P) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }

    /// Serializes `records` to `path`.
    ///
    /// The destination is only ever replaced by a rename, so a failure at any
    /// step leaves the previous file intact. A failed backup is logged and
    /// does not stop the save.
    pub fn save<T: Serialize>(&self, path: &Path, records: &[T]) -> Result<SaveReport, StoreError> {
        let json = serde_json::to_string_pretty(records)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let tmp = temp_path(path);
        if let Err(e) = write_synced(&tmp, json.as_bytes()) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&tmp, e));
        }

        let backup = match self.backup_existing(path) {
            Ok(backup) => backup,
            Err(e) => {
                warn!(error = %e, "failed to create backup");
                None
            }
        };

        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(path, e));
        }
        sync_parent_dir(path);

        info!(path = %path.display(), records = records.len(), "dataset saved");
        Ok(SaveReport {
            path: path.to_path_buf(),
            backup,
            records: records.len(),
        })
    }

    /// Copies the current bytes of `path` into a new backup file.
    ///
    /// Returns `Ok(None)` when there is nothing to back up.
    pub fn backup_existing(&self, path: &Path) -> Result<Option<PathBuf>, StoreError> {
        let previous = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        fs::create_dir_all(&self.backup_dir).map_err(|e| StoreError::io(&self.backup_dir, e))?;

        let timestamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let (backup_path, mut file) = self.create_backup_file(path, &timestamp)?;
        file.write_all(&previous)
            .and_then(|_| file.sync_all())
            .map_err(|e| StoreError::io(&backup_path, e))?;

        info!(backup = %backup_path.display(), "backup created");
        Ok(Some(backup_path))
    }

    fn create_backup_file(&self, path: &Path, timestamp: &str) -> Result<(PathBuf, File), StoreError> {
        let stem = backup_stem(path);
        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("{stem}-backup-{timestamp}.json")
            } else {
                format!("{stem}-backup-{timestamp}-{attempt}.json")
            };
            let candidate = self.backup_dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(candidate = %candidate.display(), "backup name taken");
                    attempt += 1;
                }
                Err(e) => return Err(StoreError::io(candidate, e)),
            }
        }
    }
}

/// File stem with dots replaced, so `onts.json` gives `onts` and
/// `site.a.json` gives `site_a`.
pub fn backup_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace('.', "_"))
        .unwrap_or_else(|| "dataset".to_string())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset.json".to_string());
    path.with_file_name(format!(".tmp-{name}"))
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.sync_all()
}

fn sync_parent_dir(path: &Path) {
    #[cfg(unix)]
    {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
                debug!(dir = %parent.display(), error = %e, "directory sync skipped");
            }
        }
    }
    #[cfg(not(unix))]
    let _ = path;
}
