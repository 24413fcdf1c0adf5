//! External service clients used by the intake service.

pub mod mail;

pub use mail::{MailError, SignupNotifier, SmtpNotifier};
