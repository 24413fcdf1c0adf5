//! Signup route handler.
//!
//! Validates the submitted email, deduplicates against the ledger's email
//! column, appends one row, and kicks off the best-effort confirmation
//! email. Duplicate submissions are a defined alternate outcome, not an
//! error.

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use nigela_beta_core::{Email, SignupRecord};

use crate::ledger::LedgerError;
use crate::state::AppState;

/// Signup form data, as posted by the client widget.
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    pub email: Option<String>,
    pub timestamp: Option<String>,
    pub source: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

/// The four caller-visible outcomes of a signup submission.
///
/// This is the only place faults are translated: everything below the
/// handler raises `LedgerError`, everything above sees one of these JSON
/// shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupResponse {
    /// New email recorded.
    Registered,
    /// Email was already in the ledger; no row appended.
    AlreadyRegistered,
    /// Submitted email missing or malformed.
    InvalidEmail,
    /// Fault while resolving, reading, or appending to the ledger.
    ServerError(String),
}

impl IntoResponse for SignupResponse {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Registered => (
                StatusCode::OK,
                serde_json::json!({
                    "success": true,
                    "message": "Email registered successfully",
                }),
            ),
            Self::AlreadyRegistered => (
                StatusCode::OK,
                serde_json::json!({ "message": "Email already registered" }),
            ),
            Self::InvalidEmail => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "Invalid email" }),
            ),
            Self::ServerError(description) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": format!("Server error: {description}") }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Record a beta signup.
#[instrument(skip_all, fields(source = form.source.as_deref().unwrap_or("unknown")))]
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> SignupResponse {
    process(&state, form).await
}

/// Handler body, separated from the axum extractors for direct testing.
pub async fn process(state: &AppState, form: SignupForm) -> SignupResponse {
    let email = match form.email.as_deref().map(Email::parse) {
        Some(Ok(email)) => email,
        Some(Err(e)) => {
            tracing::debug!(error = %e, "rejected signup with invalid email");
            return SignupResponse::InvalidEmail;
        }
        None => {
            tracing::debug!("rejected signup without email");
            return SignupResponse::InvalidEmail;
        }
    };

    match register(state, email, form).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "signup failed");
            SignupResponse::ServerError(e.to_string())
        }
    }
}

/// Dedup-check and append under the single-writer lock, then trigger the
/// confirmation email.
async fn register(
    state: &AppState,
    email: Email,
    form: SignupForm,
) -> Result<SignupResponse, LedgerError> {
    let ledger = state.ledger();

    // The read-then-append below must not interleave with another signup's,
    // or the same email could be recorded twice.
    let guard = state.append_lock().lock().await;

    ledger.ensure_exists().await?;

    let existing = ledger.email_column().await?;
    if existing.iter().any(|recorded| recorded == email.as_str()) {
        tracing::info!(email = %email, "email already registered");
        return Ok(SignupResponse::AlreadyRegistered);
    }

    let record = SignupRecord::from_submission(
        email.clone(),
        form.timestamp,
        form.source,
        form.location,
        form.user_agent,
        form.referrer,
        Utc::now(),
    );
    ledger.append_row(record.to_row()).await?;
    drop(guard);

    tracing::info!(email = %email, source = %record.source, "signup recorded");

    // Best-effort: the caller's response does not wait on, or change with,
    // the confirmation email.
    if let Some(notifier) = state.notifier() {
        tokio::spawn(async move {
            if let Err(e) = notifier.send_welcome(&email).await {
                tracing::warn!(email = %email, error = %e, "confirmation email failed");
            }
        });
    }

    Ok(SignupResponse::Registered)
}
