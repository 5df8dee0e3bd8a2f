//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOP_API_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `SHOP_API_ADMIN_TOKENS` - Comma-separated bearer tokens granted the admin role
//!
//! ## Optional
//! - `SHOP_API_USER_TOKENS` - Comma-separated bearer tokens granted the logged-user role
//! - `SHOP_API_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOP_API_PORT` - Listen port (default: 3000)
//! - `SHOP_API_DB_MAX_CONNECTIONS` - Connection pool size (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::models::Role;

const MIN_TOKEN_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Maximum number of pooled database connections
    pub db_max_connections: u32,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Bearer tokens accepted by the authorization layer
    pub auth: AuthConfig,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// A bearer token and the role it grants.
#[derive(Debug, Clone)]
pub struct ApiToken {
    pub token: SecretString,
    pub role: Role,
}

/// Bearer token configuration.
///
/// Tokens are held as `SecretString`, so `Debug` output never contains them.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub tokens: Vec<ApiToken>,
}

/// Sentry configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if tokens fail validation (length, placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`ApiConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database_url = env.database_url("SHOP_API_DATABASE_URL")?;
        let db_max_connections = env.parsed_or_default("SHOP_API_DB_MAX_CONNECTIONS", 10)?;
        let host = env.parsed_or_default("SHOP_API_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parsed_or_default("SHOP_API_PORT", 3000)?;
        let auth = AuthConfig::from_env(&env)?;
        let sentry = SentryConfig::from_env(&env)?;

        Ok(Self {
            database_url,
            db_max_connections,
            host,
            port,
            auth,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AuthConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self, ConfigError> {
        let mut tokens = env.token_list("SHOP_API_ADMIN_TOKENS", Role::Admin)?;
        if tokens.is_empty() {
            return Err(ConfigError::MissingEnvVar(
                "SHOP_API_ADMIN_TOKENS".to_string(),
            ));
        }
        tokens.extend(env.token_list("SHOP_API_USER_TOKENS", Role::LoggedUser)?);
        Ok(Self { tokens })
    }
}

impl SentryConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            dsn: env.optional("SENTRY_DSN"),
            environment: env.optional("SENTRY_ENVIRONMENT"),
            sample_rate: env.parsed_or_default("SENTRY_SAMPLE_RATE", defaults.sample_rate)?,
            traces_sample_rate: env
                .parsed_or_default("SENTRY_TRACES_SAMPLE_RATE", defaults.traces_sample_rate)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup with typed accessors.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable parsed as `T`, or `default` when unset.
    fn parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }

    /// Load a comma-separated token list, validating every entry.
    fn token_list(&self, key: &str, role: Role) -> Result<Vec<ApiToken>, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(Vec::new());
        };

        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                let token = SecretString::from(t.to_owned());
                validate_token_length(&token, key)?;
                validate_secret_strength(t, key)?;
                Ok(ApiToken { token, role })
            })
            .collect()
    }
}

/// Validate that a token meets minimum length requirements.
fn validate_token_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
