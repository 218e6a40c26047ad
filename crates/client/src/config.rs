//! # Client Configuration
//!
//! Settings for talking to the booking backend, read from environment variables:
//!
//! - `API_BASE_URL`: backend base URL (required)
//! - `BARBERSHOP_ID`: shop every request is scoped to (required)
//! - `API_TOKEN`: bearer token for owner endpoints (optional)
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `API_REQUEST_TIMEOUT_SECONDS`: per-request timeout (default: 30)

use barbershop_core::context::SessionContext;
use eyre::{Result, WrapErr};
use std::{env, time::Duration};
use tracing::Level;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the booking backend (e.g. "https://api.example.com/api")
    pub api_base_url: String,

    /// Shop identifier sent with every request
    pub shop_id: String,

    /// Bearer token for authenticated requests
    pub api_token: Option<String>,

    /// Log level for the application
    pub log_level: Level,

    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl ClientConfig {
    /// Loads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Fails if `API_BASE_URL` or `BARBERSHOP_ID` is not set.
    pub fn from_env() -> Result<Self> {
        let api_base_url =
            env::var("API_BASE_URL").wrap_err("API_BASE_URL environment variable must be set")?;

        let shop_id =
            env::var("BARBERSHOP_ID").wrap_err("BARBERSHOP_ID environment variable must be set")?;

        let api_token = env::var("API_TOKEN").ok().filter(|t| !t.trim().is_empty());

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Self {
            api_base_url,
            shop_id,
            api_token,
            log_level,
            request_timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Session scoped to the configured shop, authenticated if a token is set.
    pub fn session(&self) -> SessionContext {
        SessionContext {
            shop_id: self.shop_id.clone(),
            user_id: None,
            access_token: self.api_token.clone(),
        }
    }
}

pub fn parse_log_level(value: &str) -> Level {
    match value.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
