//! Boot-time fixture data for the in-memory content store and user directory.
//!
//! ```json
//! {
//!   "content": [{"id": 1, "status": "published", "kind": "post",
//!                "categories": [5], "title": "Hello", "url": "https://..."}],
//!   "users": [{"email": "a@example.org", "display_name": "A"}]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::content::{ContentItem, MemoryContentStore};
use crate::directory::{DirectoryUser, MemoryUserDirectory};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid seed file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(default)]
    pub users: Vec<DirectoryUser>,
}

impl SeedData {
    pub fn from_json(path: &str, raw: &str) -> Result<Self, SeedError> {
        serde_json::from_str(raw).map_err(|source| SeedError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Read a seed file; `None` yields empty stores
    pub async fn load(path: Option<&str>) -> Result<Self, SeedError> {
        let Some(path) = path else {
            tracing::info!("No seed file configured, starting with empty content and users");
            return Ok(Self::default());
        };

        let raw = tokio::fs::read_to_string(Path::new(path))
            .await
            .map_err(|source| SeedError::Io {
                path: path.to_string(),
                source,
            })?;
        let seed = Self::from_json(path, &raw)?;

        tracing::info!(
            path = %path,
            content = seed.content.len(),
            users = seed.users.len(),
            "Seed data loaded"
        );
        Ok(seed)
    }

    pub fn into_stores(self) -> (MemoryContentStore, MemoryUserDirectory) {
        (
            MemoryContentStore::with_items(self.content),
            MemoryUserDirectory::new(self.users),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::content::{ContentKind, PublicationStatus};

    const SEED: &str = r#"{
        "content": [
            {"id": 1, "status": "published", "kind": "post", "categories": [5],
             "title": "Hello", "url": "https://example.org/hello"},
            {"id": 2, "status": "pending", "title": "Later", "url": "https://example.org/later"}
        ],
        "users": [{"email": "a@example.org", "display_name": "A"}, {"email": "b@example.org"}]
    }"#;

    #[test]
    fn test_parse_seed() {
        let seed = SeedData::from_json("inline", SEED).unwrap();
        assert_eq!(seed.content.len(), 2);
        assert_eq!(seed.content[1].status, PublicationStatus::Other);
        assert_eq!(seed.content[1].kind, ContentKind::Post);
        assert_eq!(seed.users[1].display_name, "");

        let (content, users) = seed.into_stores();
        assert_eq!(content.count(), 2);
        assert_eq!(users.count(), 2);
    }

    #[test]
    fn test_parse_error_names_path() {
        let err = SeedData::from_json("seed.json", "{").unwrap_err();
        assert!(err.to_string().contains("seed.json"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let path = file.path().to_string_lossy().to_string();
        let seed = SeedData::load(Some(&path)).await.unwrap();
        assert_eq!(seed.content.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        assert!(matches!(
            SeedData::load(Some("/nonexistent/seed.json")).await,
            Err(SeedError::Io { .. })
        ));
        assert!(SeedData::load(None).await.unwrap().content.is_empty());
    }
}
