//! Content items and the read-only content store capability.

use std::collections::BTreeSet;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Publication state of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Published,
    /// Pending, private, scheduled, trashed, ...
    #[serde(other)]
    Other,
}

/// Kind of content item; only posts and pages get a trigger link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Post,
    Page,
    #[serde(other)]
    Other,
}

/// A post or page owned by the external content store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: u64,
    pub status: PublicationStatus,
    #[serde(default)]
    pub kind: ContentKind,
    #[serde(default)]
    pub categories: BTreeSet<u64>,
    pub title: String,
    /// Canonical URL, already encoded by the content store
    pub url: String,
}

impl ContentItem {
    pub fn is_published(&self) -> bool {
        self.status == PublicationStatus::Published
    }

    /// Whether editors may trigger a notification for this item
    pub fn accepts_notifications(&self) -> bool {
        self.is_published() && matches!(self.kind, ContentKind::Post | ContentKind::Page)
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to content items.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_content(&self, id: u64) -> Result<Option<ContentItem>, ContentError>;

    async fn get_categories(&self, id: u64) -> Result<Option<BTreeSet<u64>>, ContentError> {
        Ok(self.get_content(id).await?.map(|item| item.categories))
    }
}

/// In-memory content store, filled from the seed file or by tests
#[derive(Default)]
pub struct MemoryContentStore {
    items: DashMap<u64, ContentItem>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = ContentItem>) -> Self {
        let store = Self::new();
        for item in items {
            store.upsert(item);
        }
        store
    }

    pub fn upsert(&self, item: ContentItem) {
        self.items.insert(item.id, item);
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn get_content(&self, id: u64) -> Result<Option<ContentItem>, ContentError> {
        Ok(self.items.get(&id).map(|item| item.clone()))
    }
}
