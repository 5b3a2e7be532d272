//! File-backed `StorageBackend`.
//!
//! Each key is a file under the root directory. Writes go to a temporary
//! sibling first and are renamed into place, so a crash mid-write leaves the
//! previous value intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use prompt_builder_core::store::backend::StorageBackend;
use prompt_builder_types::error::StorageError;

/// Stores each key as `{root}/{key}`.
#[derive(Debug, Clone)]
pub struct FileStorageBackend {
    root: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileStorageBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            quota_bytes: None,
        }
    }

    /// Reject writes whose value exceeds `quota_bytes`.
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid storage key '{key}'"),
            )));
        }
        Ok(self.root.join(key))
    }
}

impl StorageBackend for FileStorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.quota_bytes.is_some_and(|quota| value.len() > quota) {
            return Err(StorageError::QuotaExceeded);
        }

        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.root)?;

        let tmp = self.root.join(format!("{key}.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        tracing::trace!(path = %path.display(), bytes = value.len(), "stored item");
        Ok(())
    }
}
