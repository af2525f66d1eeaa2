//! Mail transport abstraction.

use async_trait::async_trait;

use super::types::{MailMessage, TransportError};

/// Mail delivery capability.
///
/// Implementations deliver a single message and report failure for that
/// message only; callers decide what a failure means for the batch.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Backend identifier for logs
    fn name(&self) -> &'static str;

    /// Send one message
    async fn send(&self, message: &MailMessage) -> Result<(), TransportError>;
}

/// Transport that only logs outgoing mail (for development)
#[derive(Debug, Default)]
pub struct LogMailTransport;

impl LogMailTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailTransport for LogMailTransport {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, message: &MailMessage) -> Result<(), TransportError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            content_type = %message.content_type.mime(),
            body_len = message.body.len(),
            "Mail delivered to log transport"
        );
        tracing::debug!(body = %message.body, "Mail body");
        Ok(())
    }
}
