//! Authentication service - Exchanges username/password for a session token.
//!
//! Unknown usernames and wrong passwords fail identically: same error, same
//! message, and a password verification is performed on both paths.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::TokenManager;
use crate::domain::{Argon2Hasher, CredentialHasher, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Hash verified against when the username is unknown.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| Argon2Hasher::new().hash("dummy-password-for-timing").ok());

/// Successful login: a session token and the safe user projection
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed session token, sent back as `Authorization: Bearer <token>`
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: UserResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Login and return a session token
    async fn login(&self, username: String, password: String) -> AppResult<LoginResponse>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<TokenManager>,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, hasher: Arc<dyn CredentialHasher>, tokens: Arc<TokenManager>) -> Self {
        Self {
            uow,
            hasher,
            tokens,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, username: String, password: String) -> AppResult<LoginResponse> {
        let username = username.trim();
        let password = password.trim();

        let Some(user) = self.uow.users().find_by_username(username).await? else {
            // Keep the miss path as expensive as a mismatch
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                self.hasher.verify(password, dummy)?;
            }
            tracing::debug!(username, "Login failed: unknown username");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "Login failed: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .tokens
            .create_default_token(user.id, user.access_level)?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(LoginResponse {
            token,
            user: UserResponse::from(user),
        })
    }
}
