//! Network transport for signup submissions.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// One form-encoded signup submission, field names per the wire contract.
#[derive(Debug, Clone, Serialize)]
pub struct SignupSubmission {
    pub email: String,
    pub timestamp: String,
    pub source: String,
    pub location: String,
    #[serde(rename = "userAgent")]
    pub user_agent: String,
    pub referrer: String,
}

/// Errors that can occur when submitting a signup.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request failed at the network level (connect, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("endpoint rejected submission: {status}")]
    Rejected { status: u16 },
}

/// Capability surface of the signup endpoint, as seen from the widget.
///
/// The widget only observes transport-level success or failure; the
/// response body is not inspected (the endpoint answers 200 for both fresh
/// and already-registered emails).
#[async_trait]
pub trait SignupTransport: Send + Sync {
    /// POST one submission to the endpoint.
    async fn submit(&self, submission: &SignupSubmission) -> Result<(), TransportError>;
}

/// reqwest-backed [`SignupTransport`].
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a new transport with a request timeout.
    ///
    /// The timeout bounds how long a submission can stay in flight, so a
    /// hung endpoint cannot leave the submit control disabled forever.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(endpoint: Url, timeout: std::time::Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl SignupTransport for HttpTransport {
    async fn submit(&self, submission: &SignupSubmission) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(submission)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Rejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
