//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::IntakeConfig;
use crate::ledger::{LedgerError, SheetsLedger, SignupLedger};
use crate::services::{SignupNotifier, SmtpNotifier};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("ledger client error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("mail transport error: {0}")]
    Mail(#[from] lettre::transport::smtp::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the external collaborators. It also owns the append
/// lock that serializes the read-then-append dedup section.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: IntakeConfig,
    ledger: Arc<dyn SignupLedger>,
    notifier: Option<Arc<dyn SignupNotifier>>,
    append_lock: Mutex<()>,
}

impl AppState {
    /// Create the production state: spreadsheet ledger, SMTP notifier when
    /// mail is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger client or the SMTP transport fails
    /// to build.
    pub fn new(config: IntakeConfig) -> Result<Self, StateError> {
        let ledger: Arc<dyn SignupLedger> = Arc::new(SheetsLedger::new(&config.ledger)?);

        let notifier = match &config.mail {
            Some(mail) => {
                let notifier: Arc<dyn SignupNotifier> = Arc::new(SmtpNotifier::new(mail)?);
                Some(notifier)
            }
            None => {
                tracing::info!("SMTP not configured, confirmation email disabled");
                None
            }
        };

        Ok(Self::with_collaborators(config, ledger, notifier))
    }

    /// Assemble state from explicit collaborators. Used by tests to swap in
    /// in-memory or recording implementations.
    #[must_use]
    pub fn with_collaborators(
        config: IntakeConfig,
        ledger: Arc<dyn SignupLedger>,
        notifier: Option<Arc<dyn SignupNotifier>>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                ledger,
                notifier,
                append_lock: Mutex::new(()),
            }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &IntakeConfig {
        &self.inner.config
    }

    /// Get the signup ledger.
    #[must_use]
    pub fn ledger(&self) -> &Arc<dyn SignupLedger> {
        &self.inner.ledger
    }

    /// Get the confirmation-mail notifier, if mail is configured.
    #[must_use]
    pub fn notifier(&self) -> Option<Arc<dyn SignupNotifier>> {
        self.inner.notifier.clone()
    }

    /// The single-writer lock guarding the read-then-append section.
    #[must_use]
    pub fn append_lock(&self) -> &Mutex<()> {
        &self.inner.append_lock
    }
}
