//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, SocketAddr};

/// Secret used when `JWT_SECRET` is unset. Only suitable for local development.
pub const DEV_JWT_SECRET: &str = "finsense-dev-secret-change-in-production";

/// Gateway used when `AI_GATEWAY_URL` is unset.
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";

/// Model used when `AI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Name of the variable holding the gateway key, also used in the error
/// returned when it is missing.
pub const GATEWAY_KEY_VAR: &str = "AI_GATEWAY_API_KEY";

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP server port
    pub http_port: u16,

    /// Interface to bind
    pub bind_addr: IpAddr,

    /// SQLite database file
    pub db_path: String,

    /// JWT secret key for verifying tokens
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds
    pub jwt_access_lifetime_secs: i64,

    /// Chat completions endpoint the coach proxy forwards to
    pub ai_gateway_url: String,

    /// Bearer key for the gateway. Without it the coach returns 500.
    #[serde(skip_serializing)]
    pub ai_gateway_api_key: Option<String>,

    /// Model name sent with every coach request
    pub ai_model: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = ApiConfig {
            http_port: var("FINSENSE_HTTP_PORT", "8080")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FINSENSE_HTTP_PORT".to_string()))?,

            bind_addr: var("FINSENSE_BIND_ADDR", "0.0.0.0")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FINSENSE_BIND_ADDR".to_string()))?,

            db_path: var("FINSENSE_DB_PATH", "finsense.db"),

            jwt_secret: var("JWT_SECRET", DEV_JWT_SECRET),

            jwt_access_lifetime_secs: var("JWT_ACCESS_LIFETIME_SECS", "3600") // 1 hour
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_ACCESS_LIFETIME_SECS".to_string()))?,

            ai_gateway_url: var("AI_GATEWAY_URL", DEFAULT_GATEWAY_URL),

            ai_gateway_api_key: lookup(GATEWAY_KEY_VAR).filter(|key| !key.trim().is_empty()),

            ai_model: var("AI_MODEL", DEFAULT_MODEL),
        };

        if config.jwt_access_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_ACCESS_LIFETIME_SECS".to_string()));
        }

        if config.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }

        Ok(config)
    }

    /// Address the server listens on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }

    /// True when tokens are verified with the built-in development secret.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            http_port: 8080,
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            db_path: "finsense.db".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_access_lifetime_secs: 3600,
            ai_gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            ai_gateway_api_key: None,
            ai_model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
