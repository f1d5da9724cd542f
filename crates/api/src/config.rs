//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `API_BASE_URL` - Public URL of this server (used for webhook callbacks)
//! - `JWT_SECRET` - Token signing secret (min 32 chars)
//! - `MERCADOPAGO_ACCESS_TOKEN` - Mercado Pago API access token
//!
//! ## Optional
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 8000)
//! - `GOOGLE_CLIENT_ID` - Google OAuth client ID (Google login disabled if unset)
//! - `MERCADOPAGO_BASE_URL` - Gateway API base URL (default: production)
//! - `VIACEP_BASE_URL` - CEP lookup base URL (default: production)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

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

/// API server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of this server, without trailing slash
    pub base_url: String,
    /// JWT signing secret
    pub jwt_secret: SecretString,
    /// Google OAuth client ID; Google login is disabled when absent
    pub google_client_id: Option<String>,
    /// Mercado Pago API access token
    pub mercadopago_access_token: SecretString,
    /// Mercado Pago API base URL
    pub mercadopago_base_url: String,
    /// ViaCEP API base URL
    pub viacep_base_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the JWT secret fails the minimum-length check.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = SecretString::from(get_required_env("DATABASE_URL")?);
        let host = get_env_or_default("API_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("API_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("API_BASE_URL")?
            .trim_end_matches('/')
            .to_string();

        let jwt_secret = SecretString::from(get_required_env("JWT_SECRET")?);
        validate_secret_length(&jwt_secret, "JWT_SECRET")?;

        let google_client_id = get_optional_env("GOOGLE_CLIENT_ID");
        let mercadopago_access_token =
            SecretString::from(get_required_env("MERCADOPAGO_ACCESS_TOKEN")?);
        let mercadopago_base_url = get_env_or_default(
            "MERCADOPAGO_BASE_URL",
            "https://api.mercadopago.com",
        );
        let viacep_base_url = get_env_or_default("VIACEP_BASE_URL", "https://viacep.com.br");
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            jwt_secret,
            google_client_id,
            mercadopago_access_token,
            mercadopago_base_url,
            viacep_base_url,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// URL the payment gateway should call back with status notifications.
    #[must_use]
    pub fn notification_url(&self) -> String {
        format!("{}/webhook/mercadopago", self.base_url)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
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

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            base_url: "http://localhost:8000".to_string(),
            jwt_secret: SecretString::from("x".repeat(32)),
            google_client_id: None,
            mercadopago_access_token: SecretString::from("TEST-token"),
            mercadopago_base_url: "https://api.mercadopago.com".to_string(),
            viacep_base_url: "https://viacep.com.br".to_string(),
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_validate_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_secret_length(&secret, "TEST_SECRET").is_err());
    }

    #[test]
    fn test_validate_secret_valid_length() {
        let secret = SecretString::from("a".repeat(32));
        assert!(validate_secret_length(&secret, "TEST_SECRET").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_notification_url() {
        let config = test_config();
        assert_eq!(
            config.notification_url(),
            "http://localhost:8000/webhook/mercadopago"
        );
    }
}
