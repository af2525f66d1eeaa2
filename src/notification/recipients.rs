//! Who receives a notification.

use serde::Serialize;

use crate::directory::{DirectoryError, UserDirectory};

use super::settings::NotificationSettings;

/// One mail target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub address: String,
    /// Display name; empty for the synthetic test recipient
    pub name: String,
}

/// Where recipients come from for the current settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientSource {
    TestAddress(String),
    Directory,
}

pub fn recipient_source(settings: &NotificationSettings) -> RecipientSource {
    match settings.test_address() {
        Some(address) if settings.test_mode => RecipientSource::TestAddress(address.to_string()),
        _ => RecipientSource::Directory,
    }
}

/// Test recipient only in test mode with an address, otherwise every user in
/// directory order. The directory is not consulted in test mode.
pub async fn select_recipients(
    settings: &NotificationSettings,
    directory: &dyn UserDirectory,
) -> Result<Vec<Recipient>, DirectoryError> {
    match recipient_source(settings) {
        RecipientSource::TestAddress(address) => Ok(vec![Recipient {
            address,
            name: String::new(),
        }]),
        RecipientSource::Directory => Ok(directory
            .list_users()
            .await?
            .into_iter()
            .map(|user| Recipient {
                address: user.email,
                name: user.display_name,
            })
            .collect()),
    }
}
