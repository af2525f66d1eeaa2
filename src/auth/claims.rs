use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims of an action token: permission to run `action` on one content item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionClaims {
    /// Action name (e.g. "send_notification")
    pub action: String,
    /// Content identifier the token is scoped to
    pub content_id: u64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Token identifier, used for single-use consumption
    pub jti: Uuid,
}

impl ActionClaims {
    pub fn new(action: impl Into<String>, content_id: u64, ttl_seconds: u64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            action: action.into(),
            content_id,
            exp: now + ttl_seconds as i64,
            iat: now,
            jti: Uuid::new_v4(),
        }
    }

    /// Whether this token grants `action` on `content_id`
    pub fn grants(&self, action: &str, content_id: u64) -> bool {
        self.action == action && self.content_id == content_id
    }

    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}
