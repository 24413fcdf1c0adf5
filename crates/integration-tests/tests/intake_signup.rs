//! Integration tests for the signup handler.
//!
//! The handler runs against the in-memory ledger and a recording notifier,
//! so every caller-visible property of the intake flow is checked without
//! touching the network.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::response::IntoResponse;
use secrecy::SecretString;

use nigela_beta_core::LEDGER_HEADER;
use nigela_beta_integration_tests::{FailingLedger, RecordingNotifier};
use nigela_beta_intake::config::{IntakeConfig, LedgerConfig};
use nigela_beta_intake::ledger::{InMemoryLedger, SignupLedger};
use nigela_beta_intake::routes::signup::{SignupForm, SignupResponse, process};
use nigela_beta_intake::services::SignupNotifier;
use nigela_beta_intake::state::AppState;

fn test_config() -> IntakeConfig {
    IntakeConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        ledger: LedgerConfig {
            api_base: "https://sheets.invalid".to_string(),
            spreadsheet_id: Some("sheet-123".to_string()),
            access_token: SecretString::from("token"),
            sheet_title: "Beta Signups".to_string(),
            spreadsheet_title: "Nigela AI Beta Signups".to_string(),
        },
        mail: None,
        sentry_dsn: None,
    }
}

fn state_with(
    ledger: Arc<dyn SignupLedger>,
    notifier: Option<Arc<dyn SignupNotifier>>,
) -> AppState {
    AppState::with_collaborators(test_config(), ledger, notifier)
}

fn form(email: &str) -> SignupForm {
    SignupForm {
        email: Some(email.to_string()),
        ..SignupForm::default()
    }
}

/// Give a spawned notification task a chance to run.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}

async fn response_json(response: SignupResponse) -> serde_json::Value {
    let response = response.into_response();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_new_email_appends_exactly_one_row() {
    let ledger = Arc::new(InMemoryLedger::new());
    let state = state_with(Arc::clone(&ledger) as Arc<dyn SignupLedger>, None);

    let response = process(&state, form("a@b.com")).await;

    assert_eq!(response, SignupResponse::Registered);
    assert_eq!(
        response_json(response).await,
        serde_json::json!({ "success": true, "message": "Email registered successfully" })
    );

    let rows = ledger.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "a@b.com");
}

#[tokio::test]
async fn test_duplicate_email_is_a_dedup_hit_not_an_error() {
    let ledger = Arc::new(InMemoryLedger::new());
    let state = state_with(Arc::clone(&ledger) as Arc<dyn SignupLedger>, None);

    let first = process(&state, form("a@b.com")).await;
    let second = process(&state, form("a@b.com")).await;

    assert_eq!(first, SignupResponse::Registered);
    assert_eq!(second, SignupResponse::AlreadyRegistered);
    assert_eq!(
        response_json(second).await,
        serde_json::json!({ "message": "Email already registered" })
    );

    // Idempotence: two submissions, one row.
    assert_eq!(ledger.rows().await.len(), 1);
}

#[tokio::test]
async fn test_dedup_matches_exact_case() {
    let ledger = Arc::new(InMemoryLedger::new());
    let state = state_with(Arc::clone(&ledger) as Arc<dyn SignupLedger>, None);

    assert_eq!(
        process(&state, form("a@b.com")).await,
        SignupResponse::Registered
    );
    assert_eq!(
        process(&state, form("A@b.com")).await,
        SignupResponse::Registered
    );

    assert_eq!(ledger.rows().await.len(), 2);
}

#[tokio::test]
async fn test_invalid_email_touches_nothing() {
    let ledger = Arc::new(InMemoryLedger::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let state = state_with(
        Arc::clone(&ledger) as Arc<dyn SignupLedger>,
        Some(Arc::clone(&notifier) as Arc<dyn SignupNotifier>),
    );

    let response = process(&state, form("not-an-email")).await;

    assert_eq!(response, SignupResponse::InvalidEmail);
    assert_eq!(
        response_json(response).await,
        serde_json::json!({ "error": "Invalid email" })
    );

    settle().await;
    assert!(ledger.header().await.is_none(), "no ledger resolution");
    assert!(ledger.rows().await.is_empty());
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_missing_email_is_invalid() {
    let ledger = Arc::new(InMemoryLedger::new());
    let state = state_with(Arc::clone(&ledger) as Arc<dyn SignupLedger>, None);

    let response = process(&state, SignupForm::default()).await;

    assert_eq!(response, SignupResponse::InvalidEmail);
    assert!(ledger.rows().await.is_empty());
}

#[tokio::test]
async fn test_missing_optional_fields_are_defaulted() {
    let ledger = Arc::new(InMemoryLedger::new());
    let state = state_with(Arc::clone(&ledger) as Arc<dyn SignupLedger>, None);

    process(&state, form("a@b.com")).await;

    let rows = ledger.rows().await;
    let row = &rows[0];
    assert_eq!(row[0], "a@b.com");
    assert!(!row[1].is_empty(), "timestamp defaults to server now");
    assert_eq!(row[2], "unknown");
    assert_eq!(row[3], "");
    assert_eq!(row[4], "");
    assert_eq!(row[5], "");
    assert!(!row[6].is_empty(), "server timestamp always set");
}

#[tokio::test]
async fn test_submitted_fields_are_stored_verbatim() {
    let ledger = Arc::new(InMemoryLedger::new());
    let state = state_with(Arc::clone(&ledger) as Arc<dyn SignupLedger>, None);

    let form = SignupForm {
        email: Some("a@b.com".to_string()),
        timestamp: Some("2025-06-01T11:59:00Z".to_string()),
        source: Some("nigela_beta_landing".to_string()),
        location: Some("Mumbai".to_string()),
        user_agent: Some("Mozilla/5.0".to_string()),
        referrer: Some("https://ref.example".to_string()),
    };
    process(&state, form).await;

    let rows = ledger.rows().await;
    let row = &rows[0];
    assert_eq!(
        row[..6],
        [
            "a@b.com".to_string(),
            "2025-06-01T11:59:00Z".to_string(),
            "nigela_beta_landing".to_string(),
            "Mumbai".to_string(),
            "Mozilla/5.0".to_string(),
            "https://ref.example".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_ledger_created_with_header_before_first_row() {
    let ledger = Arc::new(InMemoryLedger::new());
    let state = state_with(Arc::clone(&ledger) as Arc<dyn SignupLedger>, None);
    assert!(ledger.header().await.is_none());

    process(&state, form("a@b.com")).await;

    assert_eq!(
        ledger.header().await.unwrap(),
        LEDGER_HEADER.map(String::from).to_vec()
    );
    assert_eq!(ledger.rows().await.len(), 1);
}

#[tokio::test]
async fn test_ledger_fault_becomes_server_error_shape() {
    let state = state_with(Arc::new(FailingLedger), None);

    let response = process(&state, form("a@b.com")).await;

    assert_eq!(
        response,
        SignupResponse::ServerError("API error: 500 - quota exceeded".to_string())
    );
    assert_eq!(
        response_json(response).await,
        serde_json::json!({ "error": "Server error: API error: 500 - quota exceeded" })
    );
}

#[tokio::test]
async fn test_confirmation_sent_once_per_new_email() {
    let ledger = Arc::new(InMemoryLedger::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let state = state_with(
        Arc::clone(&ledger) as Arc<dyn SignupLedger>,
        Some(Arc::clone(&notifier) as Arc<dyn SignupNotifier>),
    );

    process(&state, form("a@b.com")).await;
    process(&state, form("a@b.com")).await; // dedup hit, no second mail
    settle().await;

    assert_eq!(notifier.sent(), vec!["a@b.com"]);
}

#[tokio::test]
async fn test_notification_failure_never_reaches_the_caller() {
    let ledger = Arc::new(InMemoryLedger::new());
    let notifier = Arc::new(RecordingNotifier::failing());
    let state = state_with(
        Arc::clone(&ledger) as Arc<dyn SignupLedger>,
        Some(Arc::clone(&notifier) as Arc<dyn SignupNotifier>),
    );

    let response = process(&state, form("a@b.com")).await;
    settle().await;

    // The send was attempted and failed, the append and response stand.
    assert_eq!(response, SignupResponse::Registered);
    assert_eq!(notifier.sent().len(), 1);
    assert_eq!(ledger.rows().await.len(), 1);
}
