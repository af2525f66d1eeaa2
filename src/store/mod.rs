//! Process-wide configuration store.
//!
//! # Backend Architecture
//!
//! - `MemoryConfigStore`: DashMap-backed, lost on restart (default)
//! - `FileConfigStore`: one JSON document on disk, rewritten on every `set`
//!
//! Use `create_config_store()` to build the backend selected in configuration.

mod backend;
mod file_backend;
mod memory_backend;

use std::sync::Arc;

use crate::config::StoreConfig;

pub use backend::{get_or, modify, put, ConfigStore, StoreError, UpdateFn};
pub use file_backend::FileConfigStore;
pub use memory_backend::MemoryConfigStore;

/// Create a configuration store based on configuration.
///
/// - `"file"`: a `FileConfigStore` at `settings.path`
/// - `"memory"` (default): a `MemoryConfigStore`
pub async fn create_config_store(settings: &StoreConfig) -> Result<Arc<dyn ConfigStore>, StoreError> {
    match settings.backend.as_str() {
        "file" => {
            tracing::info!(backend = "file", path = %settings.path, "Creating file configuration store");
            Ok(Arc::new(FileConfigStore::open(&settings.path).await?))
        }
        other => {
            if other != "memory" {
                tracing::warn!(backend = %other, "Unknown store backend, falling back to memory");
            }
            tracing::info!(backend = "memory", "Creating memory configuration store");
            Ok(Arc::new(MemoryConfigStore::new()))
        }
    }
}
