//! SMTP transport using lettre.

use async_trait::async_trait;
use lettre::message::{header, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

use super::transport::MailTransport;
use super::types::{ContentType, MailMessage, TransportError};

pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailTransport {
    pub fn new(config: &SmtpConfig) -> Result<Self, TransportError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| TransportError::InvalidAddress(format!("{}: {}", config.from, e)))?;

        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        }
        .map_err(|e| TransportError::Config(e.to_string()))?;

        let mut builder = builder.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        tracing::info!(
            host = %config.host,
            port = config.port,
            starttls = config.starttls,
            "Configured SMTP transport"
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, message: &MailMessage) -> Result<(), TransportError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| TransportError::InvalidAddress(format!("{}: {}", message.to, e)))?;

        let content_type = match message.content_type {
            ContentType::Html => header::ContentType::TEXT_HTML,
            ContentType::Text => header::ContentType::TEXT_PLAIN,
        };

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .header(content_type)
            .body(message.body.clone())
            .map_err(|e| TransportError::Build(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| TransportError::Delivery(e.to_string()))?;

        Ok(())
    }
}
