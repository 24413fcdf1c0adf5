//! Confirmation email delivery.
//!
//! Uses SMTP via lettre. Sending is best-effort: the signup handler spawns
//! the send and only observes the outcome for logging.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use nigela_beta_core::Email;

use crate::config::MailConfig;

/// Subject line of the confirmation email.
pub const WELCOME_SUBJECT: &str = "Welcome to Nigela AI Beta!";

/// Body of the confirmation email.
pub const WELCOME_BODY: &str = "\
Dear Food Lover,

Thank you for joining the Nigela AI Beta program!

You'll start receiving daily menu emails at 9 PM, featuring:
- Cultural intelligence for festivals and traditions
- Mumbai seasonal awareness and market wisdom
- Nigella Lawson's authentic voice and warmth
- Complete daily menus with cooking videos
- Screenshot-ready format for your cook

Your first email will arrive tonight at 9 PM.

Questions? Reply to this email or contact us at rushabh@machinecraft.org

Cook with love, eat with joy!

The Nigela AI Team
Mumbai, India

P.S. Add nigela@yourdomain.com to your contacts to ensure our emails reach your inbox.
";

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Capability surface of the confirmation-mail service.
#[async_trait]
pub trait SignupNotifier: Send + Sync {
    /// Send the fixed welcome message to a new signup.
    async fn send_welcome(&self, to: &Email) -> Result<(), MailError>;
}

/// SMTP-backed [`SignupNotifier`].
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotifier {
    /// Create a new notifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP transport fails to build.
    pub fn new(config: &MailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl SignupNotifier for SmtpNotifier {
    async fn send_welcome(&self, to: &Email) -> Result<(), MailError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.to_string()))?)
            .subject(WELCOME_SUBJECT)
            .body(WELCOME_BODY.to_string())?;

        self.mailer.send(message).await?;

        tracing::info!(to = %to, "confirmation email sent");
        Ok(())
    }
}
