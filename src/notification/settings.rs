//! Notification settings record and its persistence.

use std::collections::BTreeSet;
use std::sync::Arc;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{modify, put, ConfigStore, StoreError};
use crate::template::{sanitize_template, DEFAULT_TEMPLATE};

/// Store key holding the settings record
pub const SETTINGS_KEY: &str = "notification_settings";

/// Editor-controlled notification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default)]
    pub selected_categories: BTreeSet<u64>,
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_address: Option<String>,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            template: default_template(),
            selected_categories: BTreeSet::new(),
            test_mode: false,
            test_address: None,
        }
    }
}

impl NotificationSettings {
    /// Test address with surrounding whitespace removed, if non-empty
    pub fn test_address(&self) -> Option<&str> {
        self.test_address
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid test email address: {0}")]
    InvalidTestAddress(String),

    #[error("Test mode requires a test email address")]
    MissingTestAddress,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Settings as submitted from the options form
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub selected_categories: BTreeSet<u64>,
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default)]
    pub test_address: Option<String>,
}

impl SettingsUpdate {
    /// Validate and normalize into a settings record.
    ///
    /// The template is sanitized, the test address trimmed. A non-empty test
    /// address must be a valid email address, and test mode needs one.
    pub fn into_settings(self) -> Result<NotificationSettings, SettingsError> {
        let test_address = self
            .test_address
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty());

        if let Some(ref address) = test_address {
            if !EmailAddress::is_valid(address) {
                return Err(SettingsError::InvalidTestAddress(address.clone()));
            }
        }

        if self.test_mode && test_address.is_none() {
            return Err(SettingsError::MissingTestAddress);
        }

        Ok(NotificationSettings {
            enabled: self.enabled,
            template: sanitize_template(&self.template),
            selected_categories: self.selected_categories,
            test_mode: self.test_mode,
            test_address,
        })
    }
}

/// Typed access to the settings record in the configuration store
pub struct SettingsStore {
    store: Arc<dyn ConfigStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Current settings; writes the defaults on first access
    pub async fn load(&self) -> Result<NotificationSettings, StoreError> {
        match self.store.get(SETTINGS_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => {
                // A concurrent save may land first; keep whatever is stored then
                let settings = modify(
                    self.store.as_ref(),
                    SETTINGS_KEY,
                    NotificationSettings::default(),
                    |_: &mut NotificationSettings| {},
                )
                .await?;
                tracing::info!("Initialized notification settings");
                Ok(settings)
            }
        }
    }

    /// Validate and replace the settings record
    pub async fn save(&self, update: SettingsUpdate) -> Result<NotificationSettings, SettingsError> {
        let settings = update.into_settings()?;
        put(self.store.as_ref(), SETTINGS_KEY, &settings).await?;

        tracing::info!(
            enabled = settings.enabled,
            categories = settings.selected_categories.len(),
            test_mode = settings.test_mode,
            "Saved notification settings"
        );
        Ok(settings)
    }

    /// Put the defaults back
    pub async fn reset(&self) -> Result<NotificationSettings, StoreError> {
        let defaults = NotificationSettings::default();
        put(self.store.as_ref(), SETTINGS_KEY, &defaults).await?;
        tracing::info!("Reset notification settings to defaults");
        Ok(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryConfigStore;

    fn update() -> SettingsUpdate {
        SettingsUpdate {
            enabled: true,
            template: "<p>{{post_title}}</p>".to_string(),
            selected_categories: BTreeSet::from([5]),
            test_mode: false,
            test_address: None,
        }
    }

    #[test]
    fn test_defaults() {
        let settings = NotificationSettings::default();
        assert!(!settings.enabled);
        assert!(settings.selected_categories.is_empty());
        assert!(!settings.test_mode);
        assert!(settings.template.contains("{{comments}}"));
    }

    #[test]
    fn test_blank_test_address_is_none() {
        let settings = NotificationSettings {
            test_address: Some("   ".to_string()),
            ..NotificationSettings::default()
        };
        assert_eq!(settings.test_address(), None);
    }

    #[test]
    fn test_update_sanitizes_template() {
        let settings = SettingsUpdate {
            template: "<p>{{comments}}</p><script>steal()</script>".to_string(),
            ..update()
        }
        .into_settings()
        .unwrap();
        assert_eq!(settings.template, "<p>{{comments}}</p>");
    }

    #[test]
    fn test_update_rejects_invalid_address() {
        let result = SettingsUpdate {
            test_address: Some("not-an-email".to_string()),
            ..update()
        }
        .into_settings();
        assert!(matches!(result, Err(SettingsError::InvalidTestAddress(_))));
    }

    #[test]
    fn test_test_mode_requires_address() {
        let result = SettingsUpdate {
            test_mode: true,
            test_address: Some("  ".to_string()),
            ..update()
        }
        .into_settings();
        assert!(matches!(result, Err(SettingsError::MissingTestAddress)));
    }

    #[test]
    fn test_update_trims_address() {
        let settings = SettingsUpdate {
            test_mode: true,
            test_address: Some(" qa@example.com ".to_string()),
            ..update()
        }
        .into_settings()
        .unwrap();
        assert_eq!(settings.test_address.as_deref(), Some("qa@example.com"));
    }

    #[tokio::test]
    async fn test_load_creates_defaults() {
        let store: Arc<dyn ConfigStore> = Arc::new(MemoryConfigStore::new());
        let settings = SettingsStore::new(store.clone());

        let loaded = settings.load().await.unwrap();
        assert_eq!(loaded, NotificationSettings::default());
        assert!(store.get(SETTINGS_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_save_then_reset() {
        let store: Arc<dyn ConfigStore> = Arc::new(MemoryConfigStore::new());
        let settings = SettingsStore::new(store);

        let saved = settings.save(update()).await.unwrap();
        assert!(saved.enabled);
        assert_eq!(settings.load().await.unwrap(), saved);

        let reset = settings.reset().await.unwrap();
        assert_eq!(reset, NotificationSettings::default());
        assert_eq!(settings.load().await.unwrap(), reset);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous() {
        let store: Arc<dyn ConfigStore> = Arc::new(MemoryConfigStore::new());
        let settings = SettingsStore::new(store);
        let saved = settings.save(update()).await.unwrap();

        let result = settings
            .save(SettingsUpdate {
                test_mode: true,
                ..update()
            })
            .await;
        assert!(result.is_err());
        assert_eq!(settings.load().await.unwrap(), saved);
    }
}
