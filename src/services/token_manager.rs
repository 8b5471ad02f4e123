//! Token manager - Binds the token codec to user identity and access level.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{AccessLevel, TokenError, TokenPayload};
use crate::infra::{JwtCodec, TokenCodec};

/// Mints and verifies session tokens for users.
///
/// Holds the one process-wide codec; cheap to share behind an `Arc`.
#[derive(Clone)]
pub struct TokenManager {
    codec: Arc<dyn TokenCodec>,
    default_duration: Duration,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("default_duration", &self.default_duration)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(codec: Arc<dyn TokenCodec>, default_duration: Duration) -> Self {
        Self {
            codec,
            default_duration,
        }
    }

    /// Build an HS256 manager from configuration.
    ///
    /// # Errors
    /// Fails with `InvalidKeySize` when the configured secret is too short,
    /// or `DurationOutOfRange` when the configured duration is unrepresentable.
    pub fn from_config(config: &Config) -> Result<Self, TokenError> {
        let codec = JwtCodec::new(config.token_secret_bytes())?;
        Ok(Self::new(Arc::new(codec), config.token_duration()?))
    }

    /// Validity applied by [`create_default_token`](Self::create_default_token).
    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// Issue a token valid from now for `duration`.
    pub fn create_token(
        &self,
        user_id: i64,
        access_level: AccessLevel,
        duration: Duration,
    ) -> Result<String, TokenError> {
        self.create_token_at(user_id, access_level, Utc::now(), duration)
    }

    /// Issue a token valid from `now` for `duration`.
    pub fn create_token_at(
        &self,
        user_id: i64,
        access_level: AccessLevel,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> Result<String, TokenError> {
        let payload = TokenPayload::new(user_id, access_level, now, duration)?;
        self.codec.issue(&payload)
    }

    /// Issue a token with the configured default validity.
    pub fn create_default_token(
        &self,
        user_id: i64,
        access_level: AccessLevel,
    ) -> Result<String, TokenError> {
        self.create_token(user_id, access_level, self.default_duration)
    }

    /// Verify a token against the current clock.
    pub fn verify_token(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.codec.verify(token)
    }

    /// Verify a token as of `now`.
    pub fn verify_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPayload, TokenError> {
        self.codec.verify_at(token, now)
    }
}
