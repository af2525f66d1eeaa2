//! The send-notification action: request validation in front of the dispatcher.

use std::sync::Arc;

use crate::auth::ActionTokenSigner;
use crate::content::ContentStore;
use crate::error::AppError;
use crate::metrics::ActionMetrics;

use super::dispatcher::NotificationDispatcher;
use super::settings::SettingsStore;
use super::types::{DispatchRequest, DispatchResult, SEND_NOTIFICATION_ACTION};

/// Validates trigger requests and runs the dispatch
pub struct NotificationAction {
    tokens: Arc<ActionTokenSigner>,
    content: Arc<dyn ContentStore>,
    settings: Arc<SettingsStore>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl NotificationAction {
    pub fn new(
        tokens: Arc<ActionTokenSigner>,
        content: Arc<dyn ContentStore>,
        settings: Arc<SettingsStore>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            tokens,
            content,
            settings,
            dispatcher,
        }
    }

    /// Run one trigger request.
    ///
    /// Checks, in order: action name, token scope, non-empty comment, content
    /// lookup. Nothing is sent or logged unless every check passes.
    #[tracing::instrument(
        name = "action.send_notification",
        skip(self, request),
        fields(content_id = request.content_id)
    )]
    pub async fn handle(&self, request: DispatchRequest) -> Result<DispatchResult, AppError> {
        let result = self.run(request).await;
        if let Err(ref e) = result {
            ActionMetrics::record_rejected(e.code());
        }
        result
    }

    async fn run(&self, request: DispatchRequest) -> Result<DispatchResult, AppError> {
        if request.action != SEND_NOTIFICATION_ACTION {
            return Err(AppError::Validation(format!(
                "Unknown action: {}",
                request.action
            )));
        }

        self.tokens
            .verify(&request.token, SEND_NOTIFICATION_ACTION, request.content_id)?;

        let comment = request
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|comment| !comment.is_empty())
            .ok_or_else(|| AppError::Validation("Comment cannot be empty.".to_string()))?;

        let item = self
            .content
            .get_content(request.content_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Content {}", request.content_id)))?;

        let settings = self.settings.load().await?;

        // Consume only once the request is known to reach the dispatcher
        self.tokens
            .verify_and_consume(&request.token, SEND_NOTIFICATION_ACTION, request.content_id)?;

        self.dispatcher
            .dispatch(&item, &settings, comment)
            .await
            .map_err(|e| AppError::Internal(format!("Notification dispatch failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::audit::AuditTrail;
    use crate::config::AuthConfig;
    use crate::content::{ContentItem, ContentKind, MemoryContentStore, PublicationStatus};
    use crate::directory::{DirectoryUser, MemoryUserDirectory};
    use crate::mail::{MailMessage, MailTransport, Mailer, TransportError};
    use crate::notification::SettingsUpdate;
    use crate::store::{ConfigStore, MemoryConfigStore};

    #[derive(Default)]
    struct CountingTransport {
        sends: AtomicUsize,
    }

    #[async_trait]
    impl MailTransport for CountingTransport {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn send(&self, _message: &MailMessage) -> Result<(), TransportError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Fixture {
        action: NotificationAction,
        tokens: Arc<ActionTokenSigner>,
        transport: Arc<CountingTransport>,
        audit: Arc<AuditTrail>,
    }

    async fn fixture(single_use: bool) -> Fixture {
        let store: Arc<dyn ConfigStore> = Arc::new(MemoryConfigStore::new());
        let settings = Arc::new(SettingsStore::new(store.clone()));
        settings
            .save(SettingsUpdate {
                enabled: true,
                template: "<p>{{comments}}</p>".to_string(),
                selected_categories: BTreeSet::from([5]),
                test_mode: false,
                test_address: None,
            })
            .await
            .unwrap();

        let content: Arc<dyn ContentStore> = Arc::new(MemoryContentStore::with_items(vec![
            ContentItem {
                id: 1,
                status: PublicationStatus::Published,
                kind: ContentKind::Post,
                categories: BTreeSet::from([5]),
                title: "Hello".to_string(),
                url: "https://example.org/hello".to_string(),
            },
        ]));
        let directory = Arc::new(MemoryUserDirectory::new(vec![
            DirectoryUser::new("a@example.org", "A"),
            DirectoryUser::new("b@example.org", "B"),
        ]));

        let transport = Arc::new(CountingTransport::default());
        let audit = Arc::new(AuditTrail::new(store, None));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            directory,
            Arc::new(Mailer::new(transport.clone())),
            audit.clone(),
        ));
        let tokens = Arc::new(ActionTokenSigner::new(&AuthConfig {
            single_use_tokens: single_use,
            ..AuthConfig::with_secret("action-test-secret")
        }));

        Fixture {
            action: NotificationAction::new(tokens.clone(), content, settings, dispatcher),
            tokens,
            transport,
            audit,
        }
    }

    fn request(token: String, content_id: u64, comment: Option<&str>) -> DispatchRequest {
        DispatchRequest {
            action: SEND_NOTIFICATION_ACTION.to_string(),
            content_id,
            token,
            comment: comment.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_dispatches_with_valid_request() {
        let f = fixture(false).await;
        let token = f.tokens.issue(SEND_NOTIFICATION_ACTION, 1).unwrap();

        let result = f.action.handle(request(token, 1, Some("  new section  "))).await.unwrap();
        assert_eq!(result.sent_count, 2);
        assert_eq!(f.transport.sends.load(Ordering::SeqCst), 2);

        let entries = f.audit.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].comment, "new section");
    }

    #[tokio::test]
    async fn test_empty_comment_never_dispatches() {
        let f = fixture(false).await;

        for comment in [None, Some(""), Some("   \n\t")] {
            let token = f.tokens.issue(SEND_NOTIFICATION_ACTION, 1).unwrap();
            let result = f.action.handle(request(token, 1, comment)).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }

        assert_eq!(f.transport.sends.load(Ordering::SeqCst), 0);
        assert!(f.audit.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_token_rejected_before_comment() {
        let f = fixture(false).await;
        let result = f.action.handle(request("forged".to_string(), 1, None)).await;
        assert!(matches!(result, Err(AppError::Auth(_))));
        assert_eq!(f.transport.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_action_rejected() {
        let f = fixture(false).await;
        let token = f.tokens.issue(SEND_NOTIFICATION_ACTION, 1).unwrap();
        let mut req = request(token, 1, Some("x"));
        req.action = "delete".to_string();

        assert!(matches!(
            f.action.handle(req).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_content_not_found() {
        let f = fixture(false).await;
        let token = f.tokens.issue(SEND_NOTIFICATION_ACTION, 99).unwrap();

        let result = f.action.handle(request(token, 99, Some("x"))).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(f.audit.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_use_token_replay() {
        let f = fixture(true).await;
        let token = f.tokens.issue(SEND_NOTIFICATION_ACTION, 1).unwrap();

        assert!(f.action.handle(request(token.clone(), 1, Some("x"))).await.is_ok());
        assert!(matches!(
            f.action.handle(request(token, 1, Some("x"))).await,
            Err(AppError::Auth(_))
        ));
        assert_eq!(f.audit.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_single_use_token_survives_validation_error() {
        let f = fixture(true).await;
        let token = f.tokens.issue(SEND_NOTIFICATION_ACTION, 1).unwrap();

        assert!(f.action.handle(request(token.clone(), 1, Some(" "))).await.is_err());
        assert!(f.action.handle(request(token, 1, Some("retry"))).await.is_ok());
    }
}
