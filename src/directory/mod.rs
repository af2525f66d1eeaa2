//! Registered site users, read from the external user directory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One account as listed by the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub email: String,
    #[serde(default)]
    pub display_name: String,
}

impl DirectoryUser {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("User directory unavailable: {0}")]
    Unavailable(String),
}

/// Read-only listing of every registered account.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All users, in directory order
    async fn list_users(&self) -> Result<Vec<DirectoryUser>, DirectoryError>;
}

/// Fixed user list, filled from the seed file or by tests
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: Vec<DirectoryUser>,
}

impl MemoryUserDirectory {
    pub fn new(users: Vec<DirectoryUser>) -> Self {
        Self { users }
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn list_users(&self) -> Result<Vec<DirectoryUser>, DirectoryError> {
        Ok(self.users.clone())
    }
}
