//! Session token codec backed by HS256 JWTs.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::MIN_TOKEN_SECRET_LENGTH;
use crate::domain::{AccessLevel, TokenError, TokenPayload};

/// Signs payloads into opaque tokens and verifies them back.
pub trait TokenCodec: Send + Sync {
    /// Sign `payload` into a token string.
    fn issue(&self, payload: &TokenPayload) -> Result<String, TokenError>;

    /// Verify `token` as of `now`.
    ///
    /// # Errors
    /// `InvalidToken` for anything malformed, mis-signed or signed with
    /// another algorithm; `ExpiredToken` when `now` is past the expiry.
    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenPayload, TokenError>;

    /// Verify `token` against the current clock.
    fn verify(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.verify_at(token, Utc::now())
    }
}

/// Wire claims. Times are Unix seconds.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i64,
    lvl: AccessLevel,
    iat: i64,
    exp: i64,
}

impl From<&TokenPayload> for Claims {
    fn from(payload: &TokenPayload) -> Self {
        Self {
            sub: payload.user_id,
            lvl: payload.access_level,
            iat: payload.issued_at.timestamp(),
            exp: payload.expires_at.timestamp(),
        }
    }
}

impl TryFrom<Claims> for TokenPayload {
    type Error = TokenError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let issued_at =
            DateTime::<Utc>::from_timestamp(claims.iat, 0).ok_or(TokenError::InvalidToken)?;
        let expires_at =
            DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or(TokenError::InvalidToken)?;
        Ok(TokenPayload {
            user_id: claims.sub,
            access_level: claims.lvl,
            issued_at,
            expires_at,
        })
    }
}

/// HS256 JWT codec holding the process-wide secret.
#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

// Keys stay out of debug output
impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl JwtCodec {
    /// Build a codec from the signing secret.
    ///
    /// # Errors
    /// Returns `InvalidKeySize` if `secret` is shorter than
    /// [`MIN_TOKEN_SECRET_LENGTH`] bytes.
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.len() < MIN_TOKEN_SECRET_LENGTH {
            return Err(TokenError::InvalidKeySize(MIN_TOKEN_SECRET_LENGTH));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at`, without leeway.
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }
}

impl TokenCodec for JwtCodec {
    fn issue(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        encode(
            &Header::new(Algorithm::HS256),
            &Claims::from(payload),
            &self.encoding_key,
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenPayload, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                _ => TokenError::InvalidToken,
            }
        })?;

        let payload = TokenPayload::try_from(data.claims)?;
        if payload.is_expired_at(now) {
            return Err(TokenError::ExpiredToken);
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";
    const OTHER_SECRET: &[u8] = b"fedcba9876543210fedcba9876543210";

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, hour, 0, 0).unwrap()
    }

    fn payload(now: DateTime<Utc>, duration: Duration) -> TokenPayload {
        TokenPayload::new(42, AccessLevel::Manager, now, duration).unwrap()
    }

    #[test]
    fn test_round_trip_returns_identical_payload() {
        let codec = JwtCodec::new(SECRET).unwrap();
        let original = payload(at(8), Duration::hours(1));

        let token = codec.issue(&original).unwrap();
        let verified = codec.verify_at(&token, at(8) + Duration::minutes(30)).unwrap();

        assert_eq!(verified, original);
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = JwtCodec::new(SECRET).unwrap();
        let original = payload(at(8), Duration::hours(1));
        let token = codec.issue(&original).unwrap();

        assert!(codec.verify_at(&token, original.expires_at).is_ok());
        assert_eq!(
            codec.verify_at(&token, original.expires_at + Duration::seconds(1)),
            Err(TokenError::ExpiredToken)
        );
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let issuer = JwtCodec::new(SECRET).unwrap();
        let verifier = JwtCodec::new(OTHER_SECRET).unwrap();
        let token = issuer.issue(&payload(at(8), Duration::hours(1))).unwrap();

        assert_eq!(verifier.verify_at(&token, at(8)), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_other_algorithm_is_invalid() {
        let codec = JwtCodec::new(SECRET).unwrap();
        let claims = Claims::from(&payload(at(8), Duration::hours(1)));
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(codec.verify_at(&token, at(8)), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let codec = JwtCodec::new(SECRET).unwrap();
        let token = codec.issue(&payload(at(8), Duration::hours(1))).unwrap();

        let forged = codec
            .issue(&TokenPayload::new(1, AccessLevel::Admin, at(8), Duration::hours(1)).unwrap())
            .unwrap();
        let forged_claims = forged.split('.').nth(1).unwrap().to_string();
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = &forged_claims;

        assert_eq!(
            codec.verify_at(&parts.join("."), at(8)),
            Err(TokenError::InvalidToken)
        );
        assert_eq!(codec.verify_at("not-a-token", at(8)), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_out_of_range_level_claim_is_invalid() {
        let codec = JwtCodec::new(SECRET).unwrap();
        let claims = serde_json::json!({
            "sub": 42,
            "lvl": 9,
            "iat": at(8).timestamp(),
            "exp": at(9).timestamp(),
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(codec.verify_at(&token, at(8)), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let err = JwtCodec::new(b"too-short").unwrap_err();
        assert_eq!(err, TokenError::InvalidKeySize(MIN_TOKEN_SECRET_LENGTH));
        assert!(JwtCodec::new(&SECRET[..31]).is_err());
        assert!(JwtCodec::new(SECRET).is_ok());
    }
}
