//! Mailer: a transport plus its default content type.
//!
//! Plain text is the default and is never changed after construction. A
//! dispatch that needs HTML opens a `MailScope` with `html_scope()` and sends
//! through it; the scope stamps its own content type on every message it
//! sends. Each scope is owned by one dispatch, so overlapping dispatches and
//! early returns cannot leak HTML into mail sent elsewhere.

use std::sync::Arc;

use super::transport::MailTransport;
use super::types::{ContentType, MailMessage, TransportError};

pub struct Mailer {
    transport: Arc<dyn MailTransport>,
    default_content_type: ContentType,
}

impl Mailer {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self::with_default(transport, ContentType::Text)
    }

    pub fn with_default(transport: Arc<dyn MailTransport>, content_type: ContentType) -> Self {
        Self {
            transport,
            default_content_type: content_type,
        }
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Content type of mail sent outside any scope
    pub fn content_type(&self) -> ContentType {
        self.default_content_type
    }

    /// Send with `content_type` for as long as the returned scope lives
    pub fn scoped_content_type(&self, content_type: ContentType) -> MailScope<'_> {
        MailScope {
            mailer: self,
            content_type,
        }
    }

    pub fn html_scope(&self) -> MailScope<'_> {
        self.scoped_content_type(ContentType::Html)
    }

    /// Send one message with the default content type
    pub async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), TransportError> {
        self.deliver(to, subject, body, self.default_content_type)
            .await
    }

    async fn deliver(
        &self,
        to: &str,
        subject: &str,
        body: String,
        content_type: ContentType,
    ) -> Result<(), TransportError> {
        let message = MailMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            body,
            content_type,
        };
        self.transport.send(&message).await
    }
}

/// Content-type override owned by one caller
#[must_use = "mail sent through the mailer directly keeps the default content type"]
pub struct MailScope<'a> {
    mailer: &'a Mailer,
    content_type: ContentType,
}

impl MailScope<'_> {
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Send one message with this scope's content type
    pub async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), TransportError> {
        self.mailer
            .deliver(to, subject, body, self.content_type)
            .await
    }
}
