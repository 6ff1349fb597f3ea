//! Reading JSON array files.
//!
//! The loader never fails outright: every problem is described by a
//! [`LoadOutcome`] variant, and the caller decides which of them mean "empty"
//! (merge path: missing or malformed) and which are errors.

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result of reading a JSON array file.
#[derive(Debug)]
pub enum LoadOutcome<T> {
    Loaded(Vec<T>),
    Missing(PathBuf),
    Malformed { path: PathBuf, message: String },
    Unreadable { path: PathBuf, source: std::io::Error },
}

impl<T> LoadOutcome<T> {
    /// Collapses every failure into an empty sequence.
    pub fn into_records(self) -> Vec<T> {
        match self {
            LoadOutcome::Loaded(records) => records,
            _ => Vec::new(),
        }
    }

    /// Strict view used when "no data" must not be confused with "unreadable".
    pub fn into_result(self) -> Result<Vec<T>, StoreError> {
        match self {
            LoadOutcome::Loaded(records) => Ok(records),
            LoadOutcome::Missing(path) => Err(StoreError::NotFound(path)),
            LoadOutcome::Malformed { path, message } => {
                Err(StoreError::InvalidJson { path, message })
            }
            LoadOutcome::Unreadable { path, source } => Err(StoreError::io(path, source)),
        }
    }
}

/// Reads `path` as a JSON array of `T`, emitting a diagnostic for each failure.
pub fn load_json_array<T: DeserializeOwned>(path: &Path) -> LoadOutcome<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "file not found");
            return LoadOutcome::Missing(path.to_path_buf());
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read file");
            return LoadOutcome::Unreadable {
                path: path.to_path_buf(),
                source: e,
            };
        }
    };

    match serde_json::from_str::<Vec<T>>(&content) {
        Ok(records) => {
            debug!(path = %path.display(), count = records.len(), "loaded json array");
            LoadOutcome::Loaded(records)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "error parsing JSON");
            LoadOutcome::Malformed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        }
    }
}
