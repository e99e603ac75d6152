//! Shared application state.

use std::time::Duration;

use finsense_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;

/// Everything a handler may need, shared behind an `Arc`.
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
    pub jwt: JwtManager,
    /// Client for the AI gateway. Only a connect timeout is set so a long
    /// streamed reply is never cut off.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Result<Self, reqwest::Error> {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_access_lifetime_secs);
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(AppState {
            db,
            config,
            jwt,
            http,
        })
    }
}
