//! Bearer token authentication middleware.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_SCHEME;
use crate::domain::{authorize, AccessLevel, Decision, TokenPayload};
use crate::errors::AppError;

/// Authenticated caller, taken from a verified session token.
///
/// Inserted into request extensions by [`auth_middleware`]; handlers take it
/// as an extractor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser(TokenPayload);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.user_id
    }

    /// Access level snapshot from when the token was issued.
    pub fn access_level(&self) -> AccessLevel {
        self.0.access_level
    }

    pub fn payload(&self) -> &TokenPayload {
        &self.0
    }
}

impl From<TokenPayload> for CurrentUser {
    fn from(payload: TokenPayload) -> Self {
        Self(payload)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Extract the token from `Bearer <token>`.
///
/// The header must split on single spaces into exactly two parts.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme == BEARER_SCHEME && !token.is_empty() => {
            Some(token)
        }
        _ => None,
    }
}

/// Session token authentication middleware.
///
/// Extracts and verifies the token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AppError::Unauthorized)?;

    let payload = state.tokens.verify_token(token)?;

    request.extensions_mut().insert(CurrentUser::from(payload));

    Ok(next.run(request).await)
}

/// Require at least `level`, returns Forbidden otherwise.
pub fn require_level(user: &CurrentUser, level: AccessLevel) -> Result<(), AppError> {
    match authorize(user.payload(), level) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            tracing::debug!(
                user_id = user.id(),
                held = %user.access_level(),
                required = %level,
                "Access denied"
            );
            Err(AppError::Forbidden)
        }
    }
}

/// Allow the user acting on their own record, otherwise require `level`.
pub fn require_self_or_level(
    user: &CurrentUser,
    target_id: i64,
    level: AccessLevel,
) -> Result<(), AppError> {
    if user.id() == target_id {
        Ok(())
    } else {
        require_level(user, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn user(id: i64, level: AccessLevel) -> CurrentUser {
        CurrentUser::from(TokenPayload::new(id, level, Utc::now(), Duration::hours(1)).unwrap())
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer abc extra"), None);
        assert_eq!(bearer_token("Bearer  abc"), None);
    }

    #[test]
    fn test_require_level() {
        assert!(require_level(&user(1, AccessLevel::Admin), AccessLevel::Manager).is_ok());
        assert!(matches!(
            require_level(&user(1, AccessLevel::Basic), AccessLevel::Manager),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_require_self_or_level() {
        let basic = user(3, AccessLevel::Basic);
        assert!(require_self_or_level(&basic, 3, AccessLevel::Admin).is_ok());
        assert!(require_self_or_level(&basic, 4, AccessLevel::Admin).is_err());
        assert!(require_self_or_level(&user(1, AccessLevel::Admin), 4, AccessLevel::Admin).is_ok());
    }
}
