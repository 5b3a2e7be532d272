//! Synchronous key-value storage backend for the local prompt store.
//!
//! Mirrors the shape of browser local storage: string keys, string values,
//! whole-value reads and writes. `FileStorageBackend` in prompt-builder-infra
//! persists to disk; `MemoryBackend` is an in-process implementation used by
//! tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use prompt_builder_types::error::StorageError;

/// Persistence interface for raw store bytes.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage with an optional byte quota.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that rejects writes whose value exceeds `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Unavailable)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.quota_bytes.is_some_and(|quota| value.len() > quota) {
            return Err(StorageError::QuotaExceeded);
        }
        let mut items = self.items.lock().map_err(|_| StorageError::Unavailable)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
