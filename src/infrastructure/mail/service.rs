//! Mailer trait and message types.

use async_trait::async_trait;

/// Errors that can occur while sending mail.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("SMTP error: {0}")]
    Transport(String),
}

/// A single outgoing email with both plain-text and HTML bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Outgoing email transport.
///
/// # Implementations
///
/// - [`crate::infrastructure::mail::SmtpMailer`] - SMTP delivery via `lettre`
/// - [`crate::infrastructure::mail::OutboxMailer`] - In-memory outbox when SMTP is not configured
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one message.
    ///
    /// # Errors
    ///
    /// Returns [`MailError`] if the message cannot be built or delivered.
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}
