//! Outgoing mail.
//!
//! # Transport Architecture
//!
//! - `LogMailTransport`: writes messages to the log only (default)
//! - `SmtpMailTransport`: delivers through an SMTP relay (lettre)
//!
//! `Mailer` wraps the selected transport and owns the default content type;
//! `MailScope` sends with a per-caller override.
//! Use `create_mail_transport()` to build the transport named in configuration.

mod mailer;
mod smtp;
mod transport;
mod types;

use std::sync::Arc;

use crate::config::MailConfig;

pub use mailer::{MailScope, Mailer};
pub use smtp::SmtpMailTransport;
pub use transport::{LogMailTransport, MailTransport};
pub use types::{ContentType, MailMessage, TransportError};

/// Create a mail transport based on configuration.
///
/// - `"smtp"`: an `SmtpMailTransport` for `settings.smtp`
/// - `"log"` (default): a `LogMailTransport`
pub fn create_mail_transport(settings: &MailConfig) -> Result<Arc<dyn MailTransport>, TransportError> {
    match settings.backend.as_str() {
        "smtp" => {
            tracing::info!(backend = "smtp", "Creating SMTP mail transport");
            Ok(Arc::new(SmtpMailTransport::new(&settings.smtp)?))
        }
        other => {
            if other != "log" {
                tracing::warn!(backend = %other, "Unknown mail backend, falling back to log");
            }
            tracing::info!(backend = "log", "Creating log mail transport");
            Ok(Arc::new(LogMailTransport::new()))
        }
    }
}
