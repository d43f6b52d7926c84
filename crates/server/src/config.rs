//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `ADMIN_PASSWORD` - Password for the bootstrap admin account
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 8000)
//! - `BASE_URL` - Public URL (default: http://localhost:8000)
//! - `STORE_NAME` - Display name of the shop (default: Ateliê)
//! - `PIX_KEY` - Pix key shown to customers at checkout
//! - `PIX_RECEIVER_NAME` - Name of the pix receiver (default: store name)
//! - `PIX_DISCOUNT_PERCENT` - Integer 0-100 discount for pix payments (default: 0)
//! - `PAYMENT_LINK_URL` - External card payment link
//! - `ADMIN_EMAIL` - Email of the bootstrap admin account
//! - `UPLOAD_DIR` - Directory for uploaded product images

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use atelie_core::Email;

/// Maximum accepted request body size (uploads included): 12 MiB.
pub const MAX_UPLOAD_BYTES: usize = 12 * 1024 * 1024;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

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

/// Application configuration, constructed once at startup and shared
/// immutably through [`crate::state::AppState`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, drives the secure-cookie flag
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Storefront display and payment settings
    pub store: StoreConfig,
    /// Bootstrap admin credentials
    pub admin: AdminConfig,
    /// Directory where uploaded product images are stored
    pub upload_dir: PathBuf,
}

/// Storefront display and payment settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Display name of the shop
    pub name: String,
    /// Pix key shown in payment instructions
    pub pix_key: String,
    /// Display name of the pix receiver
    pub pix_receiver: String,
    /// Discount percent applied to pix payments (0-100)
    pub pix_discount_percent: u8,
    /// External card payment link, if configured
    pub payment_link: Option<String>,
}

/// Bootstrap admin account credentials.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Email of the admin account created at bootstrap
    pub email: Email,
    /// Password of the admin account created at bootstrap
    pub password: SecretString,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the session secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_required_secret("DATABASE_URL")?;
        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("BASE_URL", "http://localhost:8000");
        let session_secret = get_required_secret("SESSION_SECRET")?;
        validate_session_secret(&session_secret, "SESSION_SECRET")?;

        let store = StoreConfig::from_env()?;
        let admin = AdminConfig::from_env()?;
        let upload_dir = PathBuf::from(get_env_or_default("UPLOAD_DIR", "static/img/uploads"));

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            store,
            admin,
            upload_dir,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let name = get_env_or_default("STORE_NAME", "Ateliê");
        let pix_receiver = get_env_or_default("PIX_RECEIVER_NAME", &name);
        Ok(Self {
            pix_key: get_env_or_default("PIX_KEY", ""),
            pix_receiver,
            pix_discount_percent: parse_discount_percent(&get_env_or_default(
                "PIX_DISCOUNT_PERCENT",
                "0",
            ))
            .map_err(|e| ConfigError::InvalidEnvVar("PIX_DISCOUNT_PERCENT".to_string(), e))?,
            payment_link: get_optional_env("PAYMENT_LINK_URL"),
            name,
        })
    }
}

impl AdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_email = get_env_or_default("ADMIN_EMAIL", "admin@atelie.example");
        let email = Email::parse(&raw_email)
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_EMAIL".to_string(), e.to_string()))?;
        Ok(Self {
            email,
            password: get_required_secret("ADMIN_PASSWORD")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable, treating the empty string as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the pix discount percent, enforcing the 0-100 range.
fn parse_discount_percent(raw: &str) -> Result<u8, String> {
    let percent = raw
        .trim()
        .parse::<u8>()
        .map_err(|e| format!("not an integer: {e}"))?;
    if percent > 100 {
        return Err(format!("must be between 0 and 100 (got {percent})"));
    }
    Ok(percent)
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn discount_percent_accepts_full_range() {
        assert_eq!(parse_discount_percent("0").unwrap(), 0);
        assert_eq!(parse_discount_percent("10").unwrap(), 10);
        assert_eq!(parse_discount_percent("100").unwrap(), 100);
    }

    #[test]
    fn discount_percent_rejects_out_of_range() {
        assert!(parse_discount_percent("101").is_err());
        assert!(parse_discount_percent("-1").is_err());
        assert!(parse_discount_percent("ten").is_err());
    }

    #[test]
    fn session_secret_too_short_is_rejected() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_err());
    }

    #[test]
    fn session_secret_of_minimum_length_passes() {
        let secret = SecretString::from("x".repeat(32));
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_ok());
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let config = AppConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            base_url: "http://localhost:8000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            store: StoreConfig {
                name: "Ateliê".to_string(),
                pix_key: "test-key".to_string(),
                pix_receiver: "Ateliê".to_string(),
                pix_discount_percent: 10,
                payment_link: None,
            },
            admin: AdminConfig {
                email: Email::parse("admin@atelie.example").unwrap(),
                password: SecretString::from("admin-password"),
            },
            upload_dir: PathBuf::from("static/img/uploads"),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }
}
