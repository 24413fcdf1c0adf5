//! HTTP route handlers for the intake service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health  - Health check
//! POST /signup  - Record a beta signup
//! ```

pub mod signup;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Create all routes for the intake service.
pub fn routes() -> Router<AppState> {
    Router::new().route("/signup", post(signup::signup))
}
