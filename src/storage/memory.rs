//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{LocalStorage, StorageError};

/// HashMap-backed storage for tests and for running without a data directory.
///
/// An optional quota caps the size of a single value, which is how a full
/// browser storage shows up to callers.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }

    pub fn with_quota(quota: usize) -> Self { Self { quota: Some(quota), ..Self::default() } }

    pub fn len(&self) -> usize { self.entries().len() }
    pub fn is_empty(&self) -> bool { self.entries().is_empty() }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota.filter(|q| value.len() > *q) {
            return Err(StorageError::QuotaExceeded { key: key.to_string(), size: value.len(), quota });
        }
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.get("mombaby-cart").unwrap().is_none());
        storage.set("mombaby-cart", "[]").unwrap();
        assert_eq!(storage.get("mombaby-cart").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.len(), 1);
        storage.remove("mombaby-cart").unwrap();
        storage.remove("mombaby-cart").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_quota_rejects_large_values() {
        let storage = MemoryStorage::with_quota(4);
        storage.set("k", "[1]").unwrap();
        let err = storage.set("k", "[1,2,3]").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { size: 7, quota: 4, .. }));
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("[1]"));
    }
}
