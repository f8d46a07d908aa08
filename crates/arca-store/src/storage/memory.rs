//! In-memory storage, the stand-in for browser local storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::CartStorage;
use crate::error::StorageError;

/// Shared in-memory key-value map with an optional byte quota.
///
/// Clones share the same map, so a test can drop a store, build a new one
/// over a clone of the same `MemoryStorage`, and observe hydration exactly
/// as after a page reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Creates an empty, unlimited storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty storage that rejects writes once the total size of
    /// keys and values would exceed `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        MemoryStorage {
            entries: Arc::default(),
            quota: Some(quota),
        }
    }

    /// Total bytes used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.iter().map(|(k, v)| k.len() + v.len()).sum())
            .unwrap_or(0)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))?;

        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
