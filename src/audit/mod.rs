//! Notification history.
//!
//! Every dispatch attempt that reached the fan-out leaves one `AuditEntry`.
//! Entries are stored in chronological order as a single JSON array in the
//! configuration store and are never edited or reordered. With a retention
//! cap the oldest entries are dropped first.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{get_or, modify, ConfigStore, StoreError};

/// Store key holding the audit log
pub const AUDIT_LOG_KEY: &str = "notification_audit_log";

/// Record of one dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub title: String,
    /// Comment as entered by the editor, not escaped
    pub comment: String,
}

impl AuditEntry {
    pub fn new(title: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            title: title.into(),
            comment: comment.into(),
        }
    }
}

/// Append-only, chronologically ordered list of entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLog {
    entries: VecDeque<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry`, then drop the oldest entries beyond `max_entries`.
    /// Returns the number of entries dropped.
    pub fn append(&mut self, entry: AuditEntry, max_entries: Option<usize>) -> usize {
        self.entries.push_back(entry);

        let mut dropped = 0;
        if let Some(max) = max_entries {
            while self.entries.len() > max {
                self.entries.pop_front();
                dropped += 1;
            }
        }
        dropped
    }

    pub fn entries(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<AuditEntry> {
        self.entries.into()
    }
}

/// Audit log persisted in the configuration store
pub struct AuditTrail {
    store: Arc<dyn ConfigStore>,
    max_entries: Option<usize>,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn ConfigStore>, max_entries: Option<usize>) -> Self {
        if max_entries == Some(0) {
            tracing::warn!("Audit retention of 0 entries keeps no history");
        }
        Self { store, max_entries }
    }

    /// Append one entry and persist the log before returning.
    ///
    /// The read-modify-write runs as one store update, so concurrent appends
    /// never drop each other's entries.
    pub async fn append(&self, entry: AuditEntry) -> Result<(), StoreError> {
        let max_entries = self.max_entries;
        let log = modify(
            self.store.as_ref(),
            AUDIT_LOG_KEY,
            AuditLog::new(),
            move |log: &mut AuditLog| {
                let dropped = log.append(entry, max_entries);
                if dropped > 0 {
                    tracing::debug!(dropped = dropped, "Audit retention dropped old entries");
                }
            },
        )
        .await?;

        tracing::debug!(entries = log.len(), "Appended audit entry");
        Ok(())
    }

    /// All entries, oldest first
    pub async fn list(&self) -> Result<Vec<AuditEntry>, StoreError> {
        Ok(self.load().await?.into_vec())
    }

    async fn load(&self) -> Result<AuditLog, StoreError> {
        get_or(self.store.as_ref(), AUDIT_LOG_KEY, AuditLog::new()).await
    }
}
