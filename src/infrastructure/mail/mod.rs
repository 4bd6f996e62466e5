//! Outgoing email.
//!
//! Provides a [`Mailer`] trait with two implementations:
//! - [`SmtpMailer`] - Production SMTP delivery
//! - [`OutboxMailer`] - In-memory outbox for development and tests
//!
//! Message bodies are rendered by [`templates`].

mod outbox_mailer;
mod service;
mod smtp_mailer;
pub mod templates;

pub use outbox_mailer::OutboxMailer;
pub use service::{EmailMessage, MailError, Mailer};
pub use smtp_mailer::SmtpMailer;

#[cfg(test)]
pub use service::MockMailer;
