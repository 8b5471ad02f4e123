//! Application settings loaded from environment variables.

use std::env;

use chrono::{Duration, Utc};

use super::constants::{
    DEFAULT_CORS_ORIGINS, DEFAULT_DATABASE_URL, DEFAULT_GENESIS_EMAIL, DEFAULT_GENESIS_USERNAME,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_TOKEN_DURATION_HOURS,
};
use crate::domain::TokenError;
use crate::errors::{AppError, AppResult};

/// Development-only signing key, used when `TOKEN_SECRET_KEY` is unset in debug builds.
const DEV_SECRET_KEY: &str = "dev-secret-key-minimum-32-chars!!";

/// Credentials for the admin seeded into an empty user table.
#[derive(Clone)]
pub struct GenesisSettings {
    pub username: String,
    pub email: String,
    password: Option<String>,
}

impl GenesisSettings {
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.filter(|p| !p.trim().is_empty()),
        }
    }

    /// Seed password, if one was configured.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl std::fmt::Debug for GenesisSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenesisSettings")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    token_secret: String,
    pub token_duration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub genesis: GenesisSettings,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("token_secret", &"[REDACTED]")
            .field("token_duration_hours", &self.token_duration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("genesis", &self.genesis)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// The secret key length is not checked here; the token codec rejects a
    /// short key when it is built at startup.
    ///
    /// # Errors
    /// Returns an error in release builds when `TOKEN_SECRET_KEY` is not set,
    /// and when `TOKEN_DURATION_HOURS` is set to anything but a usable
    /// positive number of hours.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let token_secret = match env::var("TOKEN_SECRET_KEY") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("TOKEN_SECRET_KEY not set, using insecure default for development");
                DEV_SECRET_KEY.to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "TOKEN_SECRET_KEY environment variable must be set in production",
                ))
            }
        };

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect());

        let token_duration_hours = match env::var("TOKEN_DURATION_HOURS") {
            Ok(raw) => parse_duration_hours(&raw).ok_or_else(|| {
                AppError::internal(format!("TOKEN_DURATION_HOURS is out of range: {}", raw))
            })?,
            Err(_) => DEFAULT_TOKEN_DURATION_HOURS,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            token_secret,
            token_duration_hours,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            cors_allowed_origins,
            genesis: GenesisSettings::new(
                env::var("GENESIS_USERNAME").unwrap_or_else(|_| DEFAULT_GENESIS_USERNAME.to_string()),
                env::var("GENESIS_EMAIL").unwrap_or_else(|_| DEFAULT_GENESIS_EMAIL.to_string()),
                env::var("GENESIS_PASSWORD").ok(),
            ),
        })
    }

    /// Get the token secret bytes for signing/verification.
    pub fn token_secret_bytes(&self) -> &[u8] {
        self.token_secret.as_bytes()
    }

    /// Default validity of a session token.
    ///
    /// # Errors
    /// `DurationOutOfRange` when the hours do not fit a token expiry.
    pub fn token_duration(&self) -> Result<Duration, TokenError> {
        duration_from_hours(self.token_duration_hours).ok_or(TokenError::DurationOutOfRange)
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
impl Config {
    /// Defaults with the given signing secret; nothing is read from the environment.
    pub(crate) fn with_secret(secret: &str) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            token_secret: secret.to_string(),
            token_duration_hours: DEFAULT_TOKEN_DURATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            cors_allowed_origins: vec![],
            genesis: GenesisSettings::new(DEFAULT_GENESIS_USERNAME, DEFAULT_GENESIS_EMAIL, None),
        }
    }
}

/// Positive hours whose expiry, counted from now, is still a valid timestamp.
fn duration_from_hours(hours: i64) -> Option<Duration> {
    if hours <= 0 {
        return None;
    }
    Duration::try_hours(hours).filter(|duration| Utc::now().checked_add_signed(*duration).is_some())
}

fn parse_duration_hours(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|hours| duration_from_hours(*hours).is_some())
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_drops_blanks() {
        let origins = parse_origins(" http://a.test ,, https://b.test");
        assert_eq!(origins, vec!["http://a.test", "https://b.test"]);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config {
            database_url: "postgres://user:pw@db/app".to_string(),
            token_secret: "super-secret-value-that-is-long-enough".to_string(),
            token_duration_hours: 1,
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            cors_allowed_origins: vec![],
            genesis: GenesisSettings {
                username: "adm".to_string(),
                email: "adm@email.com".to_string(),
                password: Some("seed-password".to_string()),
            },
        };

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("user:pw"));
        assert!(!debug.contains("seed-password"));
        assert_eq!(config.server_addr(), "127.0.0.1:8080");
        assert_eq!(config.token_duration(), Ok(Duration::hours(1)));
    }

    #[test]
    fn test_duration_hours_must_fit_an_expiry() {
        assert_eq!(parse_duration_hours(" 24 "), Some(24));
        assert_eq!(parse_duration_hours("0"), None);
        assert_eq!(parse_duration_hours("-3"), None);
        assert_eq!(parse_duration_hours("soon"), None);
        assert_eq!(parse_duration_hours("10000000000"), None);
        assert_eq!(parse_duration_hours(&i64::MAX.to_string()), None);

        assert_eq!(duration_from_hours(i64::MAX), None);
    }
}
