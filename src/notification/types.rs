use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::directory::DirectoryError;
use crate::store::StoreError;

/// Action name carried by trigger links and tokens
pub const SEND_NOTIFICATION_ACTION: &str = "send_notification";

/// Inbound trigger for one dispatch
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchRequest {
    pub action: String,
    pub content_id: u64,
    pub token: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Why a dispatch did not reach the fan-out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Disabled,
    Ineligible,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::Disabled => "disabled",
            SkipReason::Ineligible => "ineligible",
        }
    }
}

/// A recipient whose send failed
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryFailure {
    pub address: String,
    pub error: String,
}

/// Outcome of one dispatch call
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchResult {
    pub sent_count: usize,
    pub failure_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<DeliveryFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
}

impl DispatchResult {
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }

    /// Recipients that were given a send attempt
    pub fn attempted(&self) -> usize {
        self.sent_count + self.failure_count
    }
}

/// Infrastructure failures that stop a dispatch
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Failed to list recipients: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Failed to record audit entry: {0}")]
    Audit(#[from] StoreError),
}

/// Statistics for the notification dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    /// Dispatches that reached the fan-out
    pub total_dispatched: AtomicU64,
    /// Dispatches skipped because notifications are disabled
    pub skipped_disabled: AtomicU64,
    /// Dispatches skipped because the item did not qualify
    pub skipped_ineligible: AtomicU64,
    /// Mails accepted by the transport
    pub mails_sent: AtomicU64,
    /// Mails the transport rejected
    pub mails_failed: AtomicU64,
}

impl DispatcherStats {
    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            total_dispatched: self.total_dispatched.load(Ordering::Relaxed),
            skipped_disabled: self.skipped_disabled.load(Ordering::Relaxed),
            skipped_ineligible: self.skipped_ineligible.load(Ordering::Relaxed),
            mails_sent: self.mails_sent.load(Ordering::Relaxed),
            mails_failed: self.mails_failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub total_dispatched: u64,
    pub skipped_disabled: u64,
    pub skipped_ineligible: u64,
    pub mails_sent: u64,
    pub mails_failed: u64,
}
