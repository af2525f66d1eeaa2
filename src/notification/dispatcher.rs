use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::audit::{AuditEntry, AuditTrail};
use crate::content::ContentItem;
use crate::directory::UserDirectory;
use crate::mail::{MailScope, Mailer, TransportError};
use crate::metrics::DispatchMetrics;
use crate::template::{CompiledTemplate, TemplateBindings};

use super::eligibility::ineligibility_reason;
use super::recipients::{select_recipients, Recipient};
use super::settings::NotificationSettings;
use super::types::{
    DeliveryFailure, DispatchError, DispatchResult, DispatcherStats, DispatcherStatsSnapshot,
    SkipReason,
};

/// Subject prefix for every notification
const SUBJECT_PREFIX: &str = "Post Updated: ";

/// Notifies every recipient about one content change and records the attempt
pub struct NotificationDispatcher {
    directory: Arc<dyn UserDirectory>,
    mailer: Arc<Mailer>,
    audit: Arc<AuditTrail>,
    max_concurrent_sends: usize,
    stats: DispatcherStats,
}

impl NotificationDispatcher {
    /// Create a dispatcher that sends one mail at a time
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        mailer: Arc<Mailer>,
        audit: Arc<AuditTrail>,
    ) -> Self {
        Self {
            directory,
            mailer,
            audit,
            max_concurrent_sends: 1,
            stats: DispatcherStats::default(),
        }
    }

    /// Allow up to `limit` sends in flight during one fan-out
    pub fn with_max_concurrent_sends(mut self, limit: usize) -> Self {
        self.max_concurrent_sends = limit.max(1);
        self
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn mailer(&self) -> &Mailer {
        &self.mailer
    }

    /// Dispatch a notification about `item` with the editor's `comment`.
    ///
    /// Send failures are collected in the result and never stop the fan-out.
    /// Exactly one audit entry is written once the fan-out has run, whatever
    /// the per-recipient outcomes. There is no deduplication.
    #[tracing::instrument(
        name = "dispatcher.dispatch",
        skip(self, item, settings, comment),
        fields(content_id = item.id, test_mode = settings.test_mode)
    )]
    pub async fn dispatch(
        &self,
        item: &ContentItem,
        settings: &NotificationSettings,
        comment: &str,
    ) -> Result<DispatchResult, DispatchError> {
        if !settings.enabled {
            tracing::debug!("Notifications disabled, skipping dispatch");
            self.stats.skipped_disabled.fetch_add(1, Ordering::Relaxed);
            DispatchMetrics::record_outcome("skipped_disabled");
            return Ok(DispatchResult::skipped(SkipReason::Disabled));
        }

        if let Some(reason) = ineligibility_reason(item, settings) {
            tracing::debug!(reason = reason.as_str(), "Content not eligible, skipping dispatch");
            self.stats.skipped_ineligible.fetch_add(1, Ordering::Relaxed);
            DispatchMetrics::record_outcome("skipped_ineligible");
            return Ok(DispatchResult::skipped(SkipReason::Ineligible));
        }

        let (sent, failures) = {
            let html = self.mailer.html_scope();

            let base = CompiledTemplate::parse(&settings.template)
                .bind(&TemplateBindings::for_content(item, comment));

            let recipients = match select_recipients(settings, self.directory.as_ref()).await {
                Ok(recipients) => recipients,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to list recipients");
                    DispatchMetrics::record_outcome("error");
                    return Err(e.into());
                }
            };

            let subject = format!("{}{}", SUBJECT_PREFIX, item.title);
            self.fan_out(&html, &base, &subject, recipients).await
        };

        let failure_count = failures.len();
        self.stats.total_dispatched.fetch_add(1, Ordering::Relaxed);
        self.stats.mails_sent.fetch_add(sent as u64, Ordering::Relaxed);
        self.stats
            .mails_failed
            .fetch_add(failure_count as u64, Ordering::Relaxed);
        DispatchMetrics::record_outcome("dispatched");
        DispatchMetrics::record_fanout(sent + failure_count, sent, failure_count);

        self.audit
            .append(AuditEntry::new(item.title.clone(), comment))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to record audit entry"))?;
        DispatchMetrics::record_audit_entry();

        tracing::info!(
            sent = sent,
            failed = failure_count,
            "Notification dispatched"
        );

        Ok(DispatchResult {
            sent_count: sent,
            failure_count,
            failures,
            skipped: None,
        })
    }

    /// One render and one send attempt per recipient, in recipient order.
    async fn fan_out(
        &self,
        mail: &MailScope<'_>,
        base: &CompiledTemplate,
        subject: &str,
        recipients: Vec<Recipient>,
    ) -> (usize, Vec<DeliveryFailure>) {
        if recipients.is_empty() {
            tracing::info!("No recipients, nothing to send");
            return (0, Vec::new());
        }

        let outcomes: Vec<(Recipient, Result<(), TransportError>)> = stream::iter(recipients)
            .map(|recipient| {
                let body = base.render(&TemplateBindings::with_username(&recipient.name));
                async move {
                    let result = mail.send(&recipient.address, subject, body).await;
                    (recipient, result)
                }
            })
            .buffered(self.max_concurrent_sends)
            .collect()
            .await;

        let mut sent = 0;
        let mut failures = Vec::new();
        for (recipient, result) in outcomes {
            match result {
                Ok(()) => sent += 1,
                Err(e) => {
                    tracing::warn!(
                        recipient = %recipient.address,
                        error = %e,
                        "Failed to send notification mail"
                    );
                    failures.push(DeliveryFailure {
                        address: recipient.address,
                        error: e.to_string(),
                    });
                }
            }
        }

        (sent, failures)
    }
}
