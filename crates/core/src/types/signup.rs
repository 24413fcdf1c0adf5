//! The signup record and its ledger row layout.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Email;

/// Header row of the signup ledger, in column order.
pub const LEDGER_HEADER: [&str; 7] = [
    "Email",
    "Timestamp",
    "Source",
    "Location",
    "User Agent",
    "Referrer",
    "Server Timestamp",
];

/// Source recorded when the submission does not name one.
pub const DEFAULT_SOURCE: &str = "unknown";

/// One beta signup, as it is appended to the ledger.
///
/// Records are created only by the intake service's append path and are
/// never updated or deleted afterwards. `timestamp` is the client-reported
/// submission time (or the server's issue time when the client omitted it);
/// `server_timestamp` is always stamped by the service at append time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRecord {
    pub email: Email,
    pub timestamp: String,
    pub source: String,
    pub location: String,
    pub user_agent: String,
    pub referrer: String,
    pub server_timestamp: DateTime<Utc>,
}

impl SignupRecord {
    /// Build a record from submitted fields, applying the documented
    /// defaults: `timestamp` falls back to `now`, `source` to
    /// [`DEFAULT_SOURCE`], and the remaining fields to the empty string.
    ///
    /// Empty strings count as absent, matching the falsy-or-default
    /// handling of the original form parameters.
    #[must_use]
    pub fn from_submission(
        email: Email,
        timestamp: Option<String>,
        source: Option<String>,
        location: Option<String>,
        user_agent: Option<String>,
        referrer: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let or_default = |value: Option<String>| value.filter(|v| !v.is_empty());

        Self {
            email,
            timestamp: or_default(timestamp).unwrap_or_else(|| now.to_rfc3339()),
            source: or_default(source).unwrap_or_else(|| DEFAULT_SOURCE.to_owned()),
            location: or_default(location).unwrap_or_default(),
            user_agent: or_default(user_agent).unwrap_or_default(),
            referrer: or_default(referrer).unwrap_or_default(),
            server_timestamp: now,
        }
    }

    /// The record as a ledger row, in [`LEDGER_HEADER`] column order.
    #[must_use]
    pub fn to_row(&self) -> [String; 7] {
        [
            self.email.to_string(),
            self.timestamp.clone(),
            self.source.clone(),
            self.location.clone(),
            self.user_agent.clone(),
            self.referrer.clone(),
            self.server_timestamp.to_rfc3339(),
        ]
    }
}
