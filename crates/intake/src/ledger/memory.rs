//! In-memory ledger used by tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use nigela_beta_core::LEDGER_HEADER;

use super::{LedgerError, SignupLedger};

#[derive(Debug, Default)]
struct MemoryInner {
    header: Option<Vec<String>>,
    rows: Vec<[String; 7]>,
}

/// A [`SignupLedger`] held entirely in memory.
///
/// Mirrors the sheet layout: a header row written on creation, data rows
/// appended after it.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    inner: Mutex<MemoryInner>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The header row, if the ledger has been created.
    pub async fn header(&self) -> Option<Vec<String>> {
        self.inner.lock().await.header.clone()
    }

    /// All appended data rows, in insertion order.
    pub async fn rows(&self) -> Vec<[String; 7]> {
        self.inner.lock().await.rows.clone()
    }
}

#[async_trait]
impl SignupLedger for InMemoryLedger {
    async fn ensure_exists(&self) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().await;
        if inner.header.is_none() {
            inner.header = Some(LEDGER_HEADER.iter().map(ToString::to_string).collect());
        }
        Ok(())
    }

    async fn email_column(&self) -> Result<Vec<String>, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.iter().map(|row| row[0].clone()).collect())
    }

    async fn append_row(&self, row: [String; 7]) -> Result<(), LedgerError> {
        self.inner.lock().await.rows.push(row);
        Ok(())
    }
}
