//! Intake service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHEETS_ACCESS_TOKEN` - Bearer token for the ledger spreadsheet API
//!
//! ## Optional
//! - `INTAKE_HOST` - Bind address (default: 127.0.0.1)
//! - `INTAKE_PORT` - Listen port (default: 3000)
//! - `SHEETS_API_BASE` - Ledger API base URL (default: <https://sheets.googleapis.com>)
//! - `SHEETS_SPREADSHEET_ID` - Spreadsheet holding the ledger; when absent
//!   a fresh spreadsheet is created on first use
//! - `INTAKE_SHEET_TITLE` - Ledger sheet name (default: Beta Signups)
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`,
//!   `SMTP_FROM_ADDRESS` - Confirmation email delivery; when `SMTP_HOST` is
//!   unset the confirmation email is disabled entirely
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Intake service configuration.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Ledger spreadsheet configuration
    pub ledger: LedgerConfig,
    /// Confirmation email configuration; `None` disables the email
    pub mail: Option<MailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Ledger spreadsheet API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct LedgerConfig {
    /// Base URL of the spreadsheet API
    pub api_base: String,
    /// Spreadsheet id; a fresh spreadsheet is created when absent
    pub spreadsheet_id: Option<String>,
    /// Bearer token for the spreadsheet API
    pub access_token: SecretString,
    /// Sheet (tab) holding the signup rows
    pub sheet_title: String,
    /// Title given to a freshly created spreadsheet
    pub spreadsheet_title: String,
}

impl std::fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("api_base", &self.api_base)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"[REDACTED]")
            .field("sheet_title", &self.sheet_title)
            .field("spreadsheet_title", &self.spreadsheet_title)
            .finish()
    }
}

/// SMTP configuration for the confirmation email.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct MailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl IntakeConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("INTAKE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("INTAKE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("INTAKE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("INTAKE_PORT".to_string(), e.to_string()))?;

        let ledger = LedgerConfig::from_env()?;
        let mail = MailConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            ledger,
            mail,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl LedgerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: get_env_or_default("SHEETS_API_BASE", "https://sheets.googleapis.com"),
            spreadsheet_id: get_optional_env("SHEETS_SPREADSHEET_ID"),
            access_token: get_required_secret("SHEETS_ACCESS_TOKEN")?,
            sheet_title: get_env_or_default("INTAKE_SHEET_TITLE", "Beta Signups"),
            spreadsheet_title: get_env_or_default(
                "INTAKE_SPREADSHEET_TITLE",
                "Nigela AI Beta Signups",
            ),
        })
    }
}

impl MailConfig {
    /// Loads the SMTP block; `SMTP_HOST` being unset disables mail.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: get_required_secret("SMTP_PASSWORD")?,
            from_address: get_required_env("SMTP_FROM_ADDRESS")?,
        }))
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

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
