use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::audit::AuditTrail;
use crate::auth::ActionTokenSigner;
use crate::config::Settings;
use crate::content::ContentStore;
use crate::directory::UserDirectory;
use crate::mail::{create_mail_transport, MailTransport, Mailer, TransportError};
use crate::notification::{NotificationAction, NotificationDispatcher, SettingsStore};
use crate::seed::{SeedData, SeedError};
use crate::store::{create_config_store, ConfigStore, StoreError};

/// Failure while wiring the application at boot
#[derive(Debug, Error)]
pub enum BootError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Mail(#[from] TransportError),
    #[error(transparent)]
    Seed(#[from] SeedError),
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub config_store: Arc<dyn ConfigStore>,
    pub notification_settings: Arc<SettingsStore>,
    pub audit: Arc<AuditTrail>,
    pub content: Arc<dyn ContentStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub tokens: Arc<ActionTokenSigner>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub action: Arc<NotificationAction>,
    pub start_time: Instant,
}

impl AppState {
    /// Build every backend named in `settings`
    pub async fn build(settings: Settings) -> Result<Self, BootError> {
        let config_store = create_config_store(&settings.store).await?;
        let transport = create_mail_transport(&settings.mail)?;
        let (content, directory) = SeedData::load(settings.seed.path.as_deref())
            .await?
            .into_stores();

        Ok(Self::from_parts(
            settings,
            config_store,
            Arc::new(content),
            Arc::new(directory),
            transport,
        ))
    }

    /// Wire the state around already-built capabilities
    pub fn from_parts(
        settings: Settings,
        config_store: Arc<dyn ConfigStore>,
        content: Arc<dyn ContentStore>,
        directory: Arc<dyn UserDirectory>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        let notification_settings = Arc::new(SettingsStore::new(config_store.clone()));
        let audit = Arc::new(AuditTrail::new(
            config_store.clone(),
            settings.audit.max_entries,
        ));
        let tokens = Arc::new(ActionTokenSigner::new(&settings.auth));
        let dispatcher = Arc::new(
            NotificationDispatcher::new(
                directory.clone(),
                Arc::new(Mailer::new(transport)),
                audit.clone(),
            )
            .with_max_concurrent_sends(settings.mail.max_concurrent_sends),
        );
        let action = Arc::new(NotificationAction::new(
            tokens.clone(),
            content.clone(),
            notification_settings.clone(),
            dispatcher.clone(),
        ));

        Self {
            settings: Arc::new(settings),
            config_store,
            notification_settings,
            audit,
            content,
            directory,
            tokens,
            dispatcher,
            action,
            start_time: Instant::now(),
        }
    }
}
