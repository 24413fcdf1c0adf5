//! Widget configuration loaded from environment variables.
//!
//! The source landing page compiled its endpoint URL, source tag, and
//! location into the script; here they are injected configuration with the
//! original values as defaults.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WIDGET_ENDPOINT_URL` - Signup endpoint to POST to
//!
//! ## Optional
//! - `WIDGET_FALLBACK_PATH` - Local fallback file (default: nigela_beta_signups.json)
//! - `WIDGET_SOURCE` - Source tag sent with each signup (default: nigela_beta_landing)
//! - `WIDGET_LOCATION` - Location sent with each signup (default: Mumbai)
//! - `WIDGET_REFERRER` - Referrer sent with each signup (default: empty)
//! - `WIDGET_TIMEOUT_SECS` - Request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// User agent reported with each submission.
const USER_AGENT: &str = concat!("nigela-widget/", env!("CARGO_PKG_VERSION"));

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Widget configuration.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Signup endpoint URL
    pub endpoint_url: Url,
    /// Path of the local fallback store
    pub fallback_path: PathBuf,
    /// Source tag attached to submissions
    pub source: String,
    /// Location attached to submissions
    pub location: String,
    /// User agent attached to submissions
    pub user_agent: String,
    /// Referrer attached to submissions
    pub referrer: String,
    /// Request timeout; bounds how long the submit control stays disabled
    pub request_timeout: Duration,
}

impl WidgetConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the endpoint URL is missing or malformed,
    /// or the timeout is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let endpoint = std::env::var("WIDGET_ENDPOINT_URL")
            .map_err(|_| ConfigError::MissingEnvVar("WIDGET_ENDPOINT_URL".to_string()))?;

        let timeout_secs = get_env_or_default("WIDGET_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("WIDGET_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Self::build(&endpoint, timeout_secs)
    }

    /// Build a configuration around an explicit endpoint (e.g. a CLI
    /// override), keeping the environment-provided field values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the endpoint URL is malformed.
    pub fn build(endpoint: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        let endpoint_url = Url::parse(endpoint).map_err(|e| {
            ConfigError::InvalidEnvVar("WIDGET_ENDPOINT_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            endpoint_url,
            fallback_path: PathBuf::from(get_env_or_default(
                "WIDGET_FALLBACK_PATH",
                "nigela_beta_signups.json",
            )),
            source: get_env_or_default("WIDGET_SOURCE", "nigela_beta_landing"),
            location: get_env_or_default("WIDGET_LOCATION", "Mumbai"),
            user_agent: USER_AGENT.to_string(),
            referrer: get_env_or_default("WIDGET_REFERRER", ""),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
