//! Credential hashing and password policy.
//!
//! Plaintext passwords never leave this module in any stored form: callers
//! hand plaintext to a [`CredentialHasher`] and persist only the PHC string
//! it returns.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::config::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::errors::{AppError, AppResult};

/// One-way hashing of credentials.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash `plain_text` with a fresh salt.
    ///
    /// # Errors
    /// Returns an internal error only if the hasher itself fails.
    fn hash(&self, plain_text: &str) -> AppResult<String>;

    /// Check `plain_text` against a stored hash.
    ///
    /// A mismatch, including a malformed `hashed`, is `Ok(false)`.
    fn verify(&self, plain_text: &str, hashed: &str) -> AppResult<bool>;
}

/// Argon2id hasher with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plain_text: &str, hashed: &str) -> AppResult<bool> {
        let parsed = match PasswordHash::new(hashed) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                return Ok(false);
            }
        };
        // Parameters come from the stored hash, not from `argon2()`.
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Enforce the password length policy on a new plaintext password.
pub fn validate_password(plain_text: &str) -> AppResult<()> {
    let len = plain_text.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "Password must be at most {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Require that a password and its confirmation are identical.
pub fn ensure_confirmed(password: &str, confirmation: &str) -> AppResult<()> {
    if password != confirmation {
        return Err(AppError::validation(
            "Password and password confirmation do not match",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("SecurePassword123!").unwrap();

        assert!(hasher.verify("SecurePassword123!", &hash).unwrap());
        assert!(!hasher.verify("WrongPassword123", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = Argon2Hasher::new();
        let first = hasher.hash("SamePassword123").unwrap();
        let second = hasher.hash("SamePassword123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("SamePassword123", &first).unwrap());
        assert!(hasher.verify("SamePassword123", &second).unwrap());
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = Argon2Hasher::new().hash("hunter22").unwrap();
        assert!(!hash.contains("hunter22"));
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        let hasher = Argon2Hasher::new();
        assert!(!hasher.verify("anything", "not-a-phc-string").unwrap());
        assert!(!hasher.verify("anything", "").unwrap());
    }

    #[test]
    fn test_password_policy_bounds() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LENGTH)).is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_confirmation_must_match() {
        assert!(ensure_confirmed("secret1", "secret1").is_ok());
        assert!(matches!(
            ensure_confirmed("secret1", "secret2"),
            Err(AppError::Validation(_))
        ));
    }
}
