//! Nigela Beta Widget library.
//!
//! The client half of the signup flow: validates the email locally as a UX
//! fast-path, posts the form-encoded submission to the intake endpoint,
//! reflects the outcome through a [`status::StatusSink`], and keeps a
//! best-effort local fallback copy of confirmed submissions.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod fallback;
pub mod status;
pub mod transport;
pub mod widget;
