use dashmap::DashMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AppError;

use super::ActionClaims;

/// Issues and verifies action tokens (HS256 JWTs scoped to action + content).
pub struct ActionTokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
    single_use: bool,
    /// Consumed token ids with their expiry, only filled in single-use mode
    consumed: DashMap<Uuid, i64>,
}

impl ActionTokenSigner {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl_seconds: config.token_ttl_seconds,
            single_use: config.single_use_tokens,
            consumed: DashMap::new(),
        }
    }

    pub fn is_single_use(&self) -> bool {
        self.single_use
    }

    /// Issue a token for `action` on `content_id`
    pub fn issue(&self, action: &str, content_id: u64) -> Result<String, AppError> {
        let claims = ActionClaims::new(action, content_id, self.ttl_seconds);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign action token: {}", e)))
    }

    /// Check signature, expiry and scope without consuming the token
    pub fn verify(&self, token: &str, action: &str, content_id: u64) -> Result<ActionClaims, AppError> {
        let token_data = decode::<ActionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))?;
        let claims = token_data.claims;

        if !claims.grants(action, content_id) {
            return Err(AppError::Auth(
                "Token not valid for this action or content".to_string(),
            ));
        }

        if self.single_use && self.consumed.contains_key(&claims.jti) {
            return Err(AppError::Auth("Token already used".to_string()));
        }

        Ok(claims)
    }

    /// Verify, then mark the token used when single-use mode is on
    pub fn verify_and_consume(
        &self,
        token: &str,
        action: &str,
        content_id: u64,
    ) -> Result<ActionClaims, AppError> {
        let claims = self.verify(token, action, content_id)?;

        if self.single_use {
            self.prune_consumed();
            if self.consumed.insert(claims.jti, claims.exp).is_some() {
                // Lost a race with a concurrent request carrying the same token
                return Err(AppError::Auth("Token already used".to_string()));
            }
        }

        Ok(claims)
    }

    /// Forget consumed ids whose tokens have expired anyway
    fn prune_consumed(&self) {
        let now = chrono::Utc::now().timestamp();
        self.consumed.retain(|_, exp| *exp >= now);
    }
}
