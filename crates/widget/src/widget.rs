//! The signup submit flow.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use nigela_beta_core::Email;

use crate::config::WidgetConfig;
use crate::fallback::{FallbackEntry, FallbackStore};
use crate::status::{StatusKind, StatusSink};
use crate::transport::{SignupSubmission, SignupTransport};

/// How long the success status stays visible before auto-hiding.
pub const SUCCESS_STATUS_VISIBLE: Duration = Duration::from_secs(5);

const INVALID_EMAIL_STATUS: &str = "Please enter a valid email address";
const SUCCESS_STATUS: &str = "Welcome to Nigela AI Beta! Check your email.";
const FAILURE_STATUS: &str = "Something went wrong. Please try again.";

/// Client-side signup widget.
///
/// Wires a submitted email through local validation, the network call, and
/// the status surface. Validation here is a UX fast-path only; the intake
/// service re-validates independently as the trust boundary.
pub struct SignupWidget {
    config: WidgetConfig,
    transport: Arc<dyn SignupTransport>,
    fallback: FallbackStore,
    status: Arc<dyn StatusSink>,
}

impl SignupWidget {
    #[must_use]
    pub fn new(
        config: WidgetConfig,
        transport: Arc<dyn SignupTransport>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        let fallback = FallbackStore::new(config.fallback_path.clone());
        Self {
            config,
            transport,
            fallback,
            status,
        }
    }

    /// Submit one email. Returns whether the endpoint confirmed it.
    ///
    /// The submit control is disabled for the duration of the network call
    /// and always restored afterwards; the transport's timeout bounds that
    /// window. An error status stays up until the next interaction, a
    /// success status auto-hides after [`SUCCESS_STATUS_VISIBLE`].
    pub async fn submit(&self, raw_email: &str) -> bool {
        let trimmed = raw_email.trim();

        let email = match Email::parse(trimmed) {
            Ok(email) => email,
            Err(e) => {
                tracing::debug!(error = %e, "rejected email before network call");
                self.status.show_status(INVALID_EMAIL_STATUS, StatusKind::Error);
                return false;
            }
        };

        self.status.set_submitting(true);

        let submission = SignupSubmission {
            email: email.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            source: self.config.source.clone(),
            location: self.config.location.clone(),
            user_agent: self.config.user_agent.clone(),
            referrer: self.config.referrer.clone(),
        };

        let confirmed = match self.transport.submit(&submission).await {
            Ok(()) => {
                self.status.show_status(SUCCESS_STATUS, StatusKind::Success);
                self.status.clear_input();
                self.remember(&submission);
                self.schedule_status_hide();
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "signup submission failed");
                self.status.show_status(FAILURE_STATUS, StatusKind::Error);
                false
            }
        };

        self.status.set_submitting(false);
        confirmed
    }

    /// Keep a local backup of a confirmed submission. Best-effort: failures
    /// are logged and do not change the submit outcome.
    fn remember(&self, submission: &SignupSubmission) {
        let entry = FallbackEntry {
            email: submission.email.clone(),
            timestamp: submission.timestamp.clone(),
            source: submission.source.clone(),
        };

        match self.fallback.record(entry) {
            Ok(true) => {}
            Ok(false) => tracing::debug!(email = %submission.email, "already in local fallback"),
            Err(e) => tracing::warn!(error = %e, "could not update local fallback"),
        }
    }

    /// Auto-hide the success status after its visibility window.
    fn schedule_status_hide(&self) {
        let status = Arc::clone(&self.status);
        tokio::spawn(async move {
            tokio::time::sleep(SUCCESS_STATUS_VISIBLE).await;
            status.clear_status();
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::transport::TransportError;

    use super::*;

    /// What the fake UI saw, in order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum UiEvent {
        Submitting(bool),
        Status(String, StatusKind),
        ClearStatus,
        ClearInput,
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<UiEvent>>,
    }

    impl RecordingSink {
        fn events(&self) -> Vec<UiEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl StatusSink for RecordingSink {
        fn show_status(&self, message: &str, kind: StatusKind) {
            self.events
                .lock()
                .unwrap()
                .push(UiEvent::Status(message.to_string(), kind));
        }

        fn clear_status(&self) {
            self.events.lock().unwrap().push(UiEvent::ClearStatus);
        }

        fn set_submitting(&self, submitting: bool) {
            self.events
                .lock()
                .unwrap()
                .push(UiEvent::Submitting(submitting));
        }

        fn clear_input(&self) {
            self.events.lock().unwrap().push(UiEvent::ClearInput);
        }
    }

    /// Transport that answers from a script and records submissions.
    struct FakeTransport {
        fail: bool,
        submitted: Mutex<Vec<SignupSubmission>>,
    }

    impl FakeTransport {
        fn succeeding() -> Self {
            Self {
                fail: false,
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn submissions(&self) -> Vec<SignupSubmission> {
            self.submitted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SignupTransport for FakeTransport {
        async fn submit(&self, submission: &SignupSubmission) -> Result<(), TransportError> {
            self.submitted.lock().unwrap().push(submission.clone());
            if self.fail {
                Err(TransportError::Rejected { status: 500 })
            } else {
                Ok(())
            }
        }
    }

    fn widget_with(
        transport: Arc<FakeTransport>,
        sink: Arc<RecordingSink>,
        dir: &tempfile::TempDir,
    ) -> SignupWidget {
        let mut config = WidgetConfig::build("https://intake.example/signup", 30).unwrap();
        config.fallback_path = dir.path().join("signups.json");
        SignupWidget::new(config, transport, sink)
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_the_network() {
        let transport = Arc::new(FakeTransport::succeeding());
        let sink = Arc::new(RecordingSink::default());
        let dir = tempfile::tempdir().unwrap();
        let widget = widget_with(Arc::clone(&transport), Arc::clone(&sink), &dir);

        assert!(!widget.submit("not-an-email").await);

        assert!(transport.submissions().is_empty());
        assert_eq!(
            sink.events(),
            vec![UiEvent::Status(
                INVALID_EMAIL_STATUS.to_string(),
                StatusKind::Error
            )]
        );
    }

    #[tokio::test]
    async fn test_successful_submit_sequence() {
        let transport = Arc::new(FakeTransport::succeeding());
        let sink = Arc::new(RecordingSink::default());
        let dir = tempfile::tempdir().unwrap();
        let widget = widget_with(Arc::clone(&transport), Arc::clone(&sink), &dir);

        assert!(widget.submit("  a@b.com  ").await);

        let submissions = transport.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].email, "a@b.com"); // trimmed
        assert_eq!(submissions[0].source, "nigela_beta_landing");
        assert_eq!(submissions[0].location, "Mumbai");

        assert_eq!(
            sink.events(),
            vec![
                UiEvent::Submitting(true),
                UiEvent::Status(SUCCESS_STATUS.to_string(), StatusKind::Success),
                UiEvent::ClearInput,
                UiEvent::Submitting(false),
            ]
        );

        let fallback = FallbackStore::new(dir.path().join("signups.json"));
        assert_eq!(fallback.entries().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_not_duplicated_across_submits() {
        let transport = Arc::new(FakeTransport::succeeding());
        let sink = Arc::new(RecordingSink::default());
        let dir = tempfile::tempdir().unwrap();
        let widget = widget_with(Arc::clone(&transport), Arc::clone(&sink), &dir);

        assert!(widget.submit("a@b.com").await);
        assert!(widget.submit("a@b.com").await);

        let fallback = FallbackStore::new(dir.path().join("signups.json"));
        assert_eq!(fallback.entries().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_restores_the_control() {
        let transport = Arc::new(FakeTransport::failing());
        let sink = Arc::new(RecordingSink::default());
        let dir = tempfile::tempdir().unwrap();
        let widget = widget_with(Arc::clone(&transport), Arc::clone(&sink), &dir);

        assert!(!widget.submit("a@b.com").await);

        assert_eq!(
            sink.events(),
            vec![
                UiEvent::Submitting(true),
                UiEvent::Status(FAILURE_STATUS.to_string(), StatusKind::Error),
                UiEvent::Submitting(false),
            ]
        );

        let fallback = FallbackStore::new(dir.path().join("signups.json"));
        assert!(fallback.entries().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_status_auto_hides() {
        let transport = Arc::new(FakeTransport::succeeding());
        let sink = Arc::new(RecordingSink::default());
        let dir = tempfile::tempdir().unwrap();
        let widget = widget_with(Arc::clone(&transport), Arc::clone(&sink), &dir);

        assert!(widget.submit("a@b.com").await);
        assert!(!sink.events().contains(&UiEvent::ClearStatus));

        tokio::time::sleep(SUCCESS_STATUS_VISIBLE + Duration::from_millis(10)).await;

        assert_eq!(sink.events().last(), Some(&UiEvent::ClearStatus));
    }

    #[tokio::test]
    async fn test_error_status_does_not_auto_hide() {
        let transport = Arc::new(FakeTransport::failing());
        let sink = Arc::new(RecordingSink::default());
        let dir = tempfile::tempdir().unwrap();
        let widget = widget_with(Arc::clone(&transport), Arc::clone(&sink), &dir);

        assert!(!widget.submit("a@b.com").await);
        tokio::task::yield_now().await;

        assert!(!sink.events().contains(&UiEvent::ClearStatus));
    }
}
