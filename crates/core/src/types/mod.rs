//! Domain types for the signup flow.

mod email;
mod signup;

pub use email::{Email, EmailError};
pub use signup::{DEFAULT_SOURCE, LEDGER_HEADER, SignupRecord};
