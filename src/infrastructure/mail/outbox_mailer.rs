//! In-memory mailer used when SMTP is not configured.

use super::service::{EmailMessage, MailError, Mailer};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Keeps every sent message in memory instead of delivering it.
///
/// Messages are logged at INFO so that activation and reset links can be
/// picked up from the console during development.
///
/// # Use Cases
///
/// - Development environments without an SMTP relay
/// - Integration tests that inspect outgoing mail
#[derive(Default)]
pub struct OutboxMailer {
    sent: Mutex<Vec<EmailMessage>>,
    failing: AtomicBool,
}

impl OutboxMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `send` fail with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns a copy of the messages sent so far.
    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn messages_to(&self, recipient: &str) -> Vec<EmailMessage> {
        self.messages()
            .into_iter()
            .filter(|m| m.to == recipient)
            .collect()
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Transport("outbox is failing".to_string()));
        }

        info!(to = %message.to, subject = %message.subject, body = %message.text_body, "Email stored in outbox");

        self.sent
            .lock()
            .map_err(|_| MailError::Transport("outbox lock poisoned".to_string()))?
            .push(message);

        Ok(())
    }
}
