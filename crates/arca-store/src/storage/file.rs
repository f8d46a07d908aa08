//! File-backed storage: one JSON file per key.
//!
//! Values live at `<dir>/<key>.json`. Writes go to `<key>.json.tmp` first
//! and are renamed into place, so a crash mid-write leaves the previous
//! payload readable.

use std::io;
use std::path::{Path, PathBuf};

use arca_core::validation::validate_storage_key;
use tracing::trace;

use super::CartStorage;
use crate::error::StorageError;

/// Directory-backed key-value storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `dir`. The directory is created lazily
    /// on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    /// Returns the base directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Computes the file path for `key`.
    ///
    /// Keys are validated so they can never escape the base directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_storage_key(key).map_err(|e| StorageError::InvalidKey {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CartStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, value)?;
        std::fs::rename(&tmp_path, &path)?;

        trace!(?path, bytes = value.len(), "storage file written");
        Ok(())
    }
}
