//! Session token payload and token failure kinds.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use thiserror::Error;

use super::access_level::AccessLevel;

/// Claims carried by a session token.
///
/// The access level is a snapshot taken at issuance; later changes to the
/// user's stored level are not reflected until a new token is minted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub user_id: i64,
    pub access_level: AccessLevel,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenPayload {
    /// Build a payload valid from `now` for `duration`.
    ///
    /// Timestamps are truncated to whole seconds to match the token wire form.
    ///
    /// # Errors
    /// `DurationOutOfRange` when the expiry cannot be represented.
    pub fn new(
        user_id: i64,
        access_level: AccessLevel,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> Result<Self, TokenError> {
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(duration)
            .ok_or(TokenError::DurationOutOfRange)?;
        Ok(Self {
            user_id,
            access_level,
            issued_at,
            expires_at,
        })
    }

    /// Whether the payload is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Token issuance and verification failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is invalid")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("invalid key size: must be at least {0} characters")]
    InvalidKeySize(usize),

    #[error("token duration is out of range")]
    DurationOutOfRange,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

impl TokenError {
    /// Failures caused by the presented token rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TokenError::InvalidToken | TokenError::ExpiredToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_payload_truncates_subseconds() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
            + Duration::milliseconds(750);
        let payload = TokenPayload::new(1, AccessLevel::Basic, now, Duration::hours(1)).unwrap();

        assert_eq!(payload.issued_at.timestamp_subsec_nanos(), 0);
        assert_eq!(payload.expires_at - payload.issued_at, Duration::hours(1));
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let payload = TokenPayload::new(1, AccessLevel::Basic, now, Duration::minutes(5)).unwrap();

        assert!(!payload.is_expired_at(payload.expires_at));
        assert!(payload.is_expired_at(payload.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_client_error_kinds() {
        assert!(TokenError::InvalidToken.is_client_error());
        assert!(TokenError::ExpiredToken.is_client_error());
        assert!(!TokenError::InvalidKeySize(32).is_client_error());
        assert!(!TokenError::Encoding("boom".into()).is_client_error());
        assert!(!TokenError::DurationOutOfRange.is_client_error());
    }

    #[test]
    fn test_overflowing_duration_is_an_error() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        assert_eq!(
            TokenPayload::new(1, AccessLevel::Basic, now, Duration::hours(10_000_000_000)),
            Err(TokenError::DurationOutOfRange)
        );
    }
}
