//! In-memory configuration store using DashMap.
//!
//! Values are lost on restart; used for development and tests.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::backend::{ConfigStore, StoreError, UpdateFn};

#[derive(Default)]
pub struct MemoryConfigStore {
    values: DashMap<String, serde_json::Value>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn update(&self, key: &str, apply: UpdateFn) -> Result<serde_json::Value, StoreError> {
        // The entry holds the shard write lock until it is dropped
        match self.values.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let next = apply(Some(entry.get().clone()))?;
                entry.insert(next.clone());
                Ok(next)
            }
            Entry::Vacant(entry) => {
                let next = apply(None)?;
                entry.insert(next.clone());
                Ok(next)
            }
        }
    }
}
