//! Integration tests for the Nigela beta signup flow.
//!
//! # Test Categories
//!
//! - `intake_signup` - Signup handler against an in-memory ledger
//! - `sheets_ledger` - Spreadsheet ledger client against a mock server
//! - `widget_flow` - Client widget against a mock endpoint
//!
//! This library holds the shared test doubles: a recording confirmation
//! notifier, a ledger that always faults, and a recording status sink.

use std::sync::Mutex;

use async_trait::async_trait;

use nigela_beta_core::Email;
use nigela_beta_intake::ledger::{LedgerError, SignupLedger};
use nigela_beta_intake::services::{MailError, SignupNotifier};
use nigela_beta_widget::status::{StatusKind, StatusSink};

/// Notifier that records recipients instead of sending mail.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose sends always fail, for best-effort semantics tests.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Recipients of attempted sends, in order.
    ///
    /// # Panics
    ///
    /// Panics if the interior lock is poisoned.
    #[must_use]
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl SignupNotifier for RecordingNotifier {
    async fn send_welcome(&self, to: &Email) -> Result<(), MailError> {
        self.sent
            .lock()
            .expect("lock poisoned")
            .push(to.to_string());

        if self.fail {
            Err(MailError::InvalidAddress(to.to_string()))
        } else {
            Ok(())
        }
    }
}

/// Ledger whose every operation faults, for server-error shape tests.
pub struct FailingLedger;

fn ledger_fault() -> LedgerError {
    LedgerError::Api {
        status: 500,
        message: "quota exceeded".to_string(),
    }
}

#[async_trait]
impl SignupLedger for FailingLedger {
    async fn ensure_exists(&self) -> Result<(), LedgerError> {
        Err(ledger_fault())
    }

    async fn email_column(&self) -> Result<Vec<String>, LedgerError> {
        Err(ledger_fault())
    }

    async fn append_row(&self, _row: [String; 7]) -> Result<(), LedgerError> {
        Err(ledger_fault())
    }
}

/// What a widget status surface saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Submitting(bool),
    Status(String, StatusKind),
    ClearStatus,
    ClearInput,
}

/// Status sink that records every UI operation.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, in order.
    ///
    /// # Panics
    ///
    /// Panics if the interior lock is poisoned.
    #[must_use]
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().expect("lock poisoned").clone()
    }
}

impl StatusSink for RecordingSink {
    fn show_status(&self, message: &str, kind: StatusKind) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push(UiEvent::Status(message.to_string(), kind));
    }

    fn clear_status(&self) {
        self.events.lock().expect("lock poisoned").push(UiEvent::ClearStatus);
    }

    fn set_submitting(&self, submitting: bool) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push(UiEvent::Submitting(submitting));
    }

    fn clear_input(&self) {
        self.events.lock().expect("lock poisoned").push(UiEvent::ClearInput);
    }
}
