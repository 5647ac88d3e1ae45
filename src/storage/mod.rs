//! Durable key-value storage, the stand-in for browser `localStorage`.
//!
//! Stores only see the [`LocalStorage`] trait. Values are UTF-8 JSON text
//! written whole under a fixed key, with no versioning.

mod file;
mod memory;

use std::fmt;
use std::sync::Arc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

pub trait LocalStorage: fmt::Debug + Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub type SharedStorage = Arc<dyn LocalStorage>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("quota exceeded writing {key}: {size} bytes, limit {quota}")]
    QuotaExceeded { key: String, size: usize, quota: usize },
    #[error("could not serialize value for {key}: {source}")]
    Serialize { key: String, #[source] source: serde_json::Error },
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

#[derive(Error, Debug)]
pub enum HydrateError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("malformed value under {key}: {source}")]
    Malformed { key: String, #[source] source: serde_json::Error },
}

/// Reads and parses the JSON value under `key`. A missing key is `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn LocalStorage, key: &str) -> Result<Option<T>, HydrateError> {
    let Some(raw) = storage.get(key)? else { return Ok(None) };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| HydrateError::Malformed { key: key.to_string(), source })
}

pub fn save_json<T: Serialize + ?Sized>(storage: &dyn LocalStorage, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)
        .map_err(|source| StorageError::Serialize { key: key.to_string(), source })?;
    storage.set(key, &raw)
}
