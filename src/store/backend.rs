//! Backend trait for the configuration store.
//!
//! The store is a flat key/value map of JSON values. Notification settings and
//! the audit log each live under one key and are written as a whole.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors that can occur during configuration store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing document is not a JSON object
    #[error("Corrupt store document: {0}")]
    Corrupt(String),
}

/// Read-modify-write step for `ConfigStore::update`: receives the current
/// value (if any) and returns the value to store.
pub type UpdateFn =
    Box<dyn FnOnce(Option<serde_json::Value>) -> Result<serde_json::Value, StoreError> + Send>;

/// Key/value store for process-wide configuration state.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Backend identifier for logs and health output
    fn backend_name(&self) -> &'static str;

    /// Read the raw value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Replace the value stored under `key`
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;

    /// Atomically replace the value under `key` with `apply(current)`.
    ///
    /// No other write to the store can interleave between the read and the
    /// write. When `apply` fails nothing is stored. Returns the stored value.
    async fn update(&self, key: &str, apply: UpdateFn) -> Result<serde_json::Value, StoreError>;
}

/// Read a typed value, falling back to `default` when the key is absent.
pub async fn get_or<T>(store: &dyn ConfigStore, key: &str, default: T) -> Result<T, StoreError>
where
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(default),
    }
}

/// Serialize and write a typed value.
pub async fn put<T>(store: &dyn ConfigStore, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + Sync,
{
    store.set(key, serde_json::to_value(value)?).await
}

/// Typed read-modify-write: load `key` (or `default`), let `change` edit it,
/// store the result atomically and return it.
pub async fn modify<T, F>(
    store: &dyn ConfigStore,
    key: &str,
    default: T,
    change: F,
) -> Result<T, StoreError>
where
    T: Serialize + DeserializeOwned + Send + 'static,
    F: FnOnce(&mut T) + Send + 'static,
{
    let stored = store
        .update(
            key,
            Box::new(move |current| {
                let mut value = match current {
                    Some(raw) => serde_json::from_value(raw)?,
                    None => default,
                };
                change(&mut value);
                Ok(serde_json::to_value(&value)?)
            }),
        )
        .await?;
    Ok(serde_json::from_value(stored)?)
}
