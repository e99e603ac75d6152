//! # Coach Client Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FINSENSE_COACH_URL=http://localhost:8080/api/coach                 │
//! │     FINSENSE_ACCESS_TOKEN=eyJhbGciOi...                                │
//! │     FINSENSE_USER_ID=6f1c...                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/finsense/coach.toml (Linux)                              │
//! │     ~/Library/Application Support/app.finsense.finsense/coach.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # coach.toml
//! [endpoint]
//! url = "http://localhost:8080/api/coach"
//! access_token = "eyJhbGciOi..."
//! timeout_secs = 60
//!
//! [user]
//! id = "6f1c2d9e-..."
//! db_path = "finsense.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{CoachError, CoachResult};

// =============================================================================
// Endpoint Settings
// =============================================================================

/// Where the coach endpoint lives and how to call it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSettings {
    /// Full URL of `POST /api/coach`.
    #[serde(default = "default_url")]
    pub url: String,

    /// Bearer token sent with every request.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Connect timeout, and the longest gap allowed between two chunks of
    /// a reply (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:8080/api/coach".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for EndpointSettings {
    fn default() -> Self {
        EndpointSettings {
            url: default_url(),
            access_token: None,
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// User Settings
// =============================================================================

/// Whose data the terminal client reads and where it lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    /// User id every query is scoped by. Required.
    #[serde(default)]
    pub id: String,

    /// SQLite database path.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    "finsense.db".to_string()
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            id: String::new(),
            db_path: default_db_path(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete coach client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachConfig {
    #[serde(default)]
    pub endpoint: EndpointSettings,

    #[serde(default)]
    pub user: UserSettings,
}

impl CoachConfig {
    /// Config pointing at `url` for `user_id`, everything else default.
    pub fn for_endpoint(url: impl Into<String>, user_id: impl Into<String>) -> Self {
        CoachConfig {
            endpoint: EndpointSettings {
                url: url.into(),
                ..EndpointSettings::default()
            },
            user: UserSettings {
                id: user_id.into(),
                db_path: default_db_path(),
            },
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (coach.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CoachResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading coach config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CoachResult<()> {
        if self.user.id.trim().is_empty() {
            return Err(CoachError::Config(
                "user id is not configured (set FINSENSE_USER_ID)".into(),
            ));
        }

        let url = self.endpoint_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CoachError::Config(format!(
                "Coach URL must start with http:// or https://, got: {}",
                self.endpoint.url
            )));
        }

        if self.endpoint.timeout_secs == 0 {
            return Err(CoachError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Parsed endpoint URL.
    pub fn endpoint_url(&self) -> CoachResult<Url> {
        Ok(Url::parse(&self.endpoint.url)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.timeout_secs)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("FINSENSE_COACH_URL") {
            debug!(url = %url, "Overriding coach URL from environment");
            self.endpoint.url = url;
        }

        if let Ok(token) = std::env::var("FINSENSE_ACCESS_TOKEN") {
            self.endpoint.access_token = Some(token);
        }

        if let Ok(id) = std::env::var("FINSENSE_USER_ID") {
            debug!(user_id = %id, "Overriding user id from environment");
            self.user.id = id;
        }

        if let Ok(path) = std::env::var("FINSENSE_DB_PATH") {
            self.user.db_path = path;
        }

        if let Ok(secs) = std::env::var("FINSENSE_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.endpoint.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid FINSENSE_REQUEST_TIMEOUT_SECS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("app", "finsense", "finsense")
            .map(|dirs| dirs.config_dir().join("coach.toml"))
    }
}
