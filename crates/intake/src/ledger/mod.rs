//! The append-only signup ledger.
//!
//! The ledger is an external spreadsheet reached through a narrow
//! capability surface: resolve-or-create, read the email column, append
//! one row. The service never updates or deletes rows.

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod sheets;

pub use memory::InMemoryLedger;
pub use sheets::SheetsLedger;

/// Errors that can occur when talking to the ledger store.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Capability surface of the signup ledger.
#[async_trait]
pub trait SignupLedger: Send + Sync {
    /// Resolve the backing sheet, creating it (with its header row) when it
    /// does not exist yet.
    async fn ensure_exists(&self) -> Result<(), LedgerError>;

    /// Read the email column as a flat sequence, data rows only.
    async fn email_column(&self) -> Result<Vec<String>, LedgerError>;

    /// Append one row in header column order. A single atomic write under
    /// the store's own guarantees.
    async fn append_row(&self, row: [String; 7]) -> Result<(), LedgerError>;
}
