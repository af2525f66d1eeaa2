//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use content_notifier::content::{ContentItem, ContentKind, PublicationStatus};
use content_notifier::directory::DirectoryUser;
use content_notifier::mail::{MailMessage, MailTransport, TransportError};

/// Records every message; addresses in `fail_for` are rejected
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<MailMessage>>,
    fail_for: Vec<String>,
    delay: Option<Duration>,
}

impl RecordingTransport {
    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_for: addresses.iter().map(|a| a.to_string()).collect(),
            delay: None,
        }
    }

    /// Every send waits `delay` first, so concurrent dispatches interleave
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, message: &MailMessage) -> Result<(), TransportError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_for.contains(&message.to) {
            return Err(TransportError::Delivery(format!("rejected {}", message.to)));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn post(id: u64, status: PublicationStatus, categories: &[u64]) -> ContentItem {
    ContentItem {
        id,
        status,
        kind: ContentKind::Post,
        categories: categories.iter().copied().collect::<BTreeSet<_>>(),
        title: format!("Post {}", id),
        url: format!("https://example.org/?p={}", id),
    }
}

pub fn users() -> Vec<DirectoryUser> {
    vec![
        DirectoryUser::new("alice@example.org", "Alice"),
        DirectoryUser::new("bob@example.org", "Bob"),
        DirectoryUser::new("carol@example.org", "Carol"),
    ]
}
