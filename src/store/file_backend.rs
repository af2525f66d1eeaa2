//! File-backed configuration store.
//!
//! The whole store is one JSON object on disk. Every `set` rewrites the
//! document through a temporary file and an atomic rename, while holding the
//! document mutex so concurrent writers cannot interleave.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::backend::{ConfigStore, StoreError, UpdateFn};

pub struct FileConfigStore {
    path: PathBuf,
    document: Mutex<serde_json::Map<String, serde_json::Value>>,
}

impl FileConfigStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let document = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => serde_json::Map::new(),
            Ok(bytes) => match serde_json::from_slice::<serde_json::Value>(&bytes)? {
                serde_json::Value::Object(map) => map,
                other => {
                    return Err(StoreError::Corrupt(format!(
                        "expected object at top level, found {}",
                        json_kind(&other)
                    )))
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => serde_json::Map::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            path = %path.display(),
            keys = document.len(),
            "Opened file configuration store"
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(
        &self,
        document: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let document = self.document.lock().await;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        self.write_locked(&mut document, key, value).await
    }

    async fn update(&self, key: &str, apply: UpdateFn) -> Result<serde_json::Value, StoreError> {
        // Read and write under one lock so concurrent updates serialize
        let mut document = self.document.lock().await;
        let next = apply(document.get(key).cloned())?;
        self.write_locked(&mut document, key, next.clone()).await?;
        Ok(next)
    }
}

impl FileConfigStore {
    /// Replace one key and persist; the caller holds the document lock
    async fn write_locked(
        &self,
        document: &mut serde_json::Map<String, serde_json::Value>,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), StoreError> {
        let previous = document.insert(key.to_string(), value);

        if let Err(e) = self.persist(document).await {
            // Keep memory consistent with disk
            match previous {
                Some(old) => document.insert(key.to_string(), old),
                None => document.remove(key),
            };
            tracing::error!(path = %self.path.display(), error = %e, "Failed to persist store");
            return Err(e);
        }

        tracing::debug!(key = %key, "Persisted configuration value");
        Ok(())
    }
}
